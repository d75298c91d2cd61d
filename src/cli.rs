// src/cli.rs
use crate::checks::{
    run_check, AgentsCheck, Check, CompilesCheck, ResourcesCheck, ServicesCheck, SettingsCheck,
};
use crate::client::InmantaClient;
use crate::config::{self, Config, ConfigError};
use crate::nagios::CheckResult;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "inmanta-check",
    version,
    about = "Nagios checks for an Inmanta orchestration server"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "INMANTA_CHECK_CONFIG",
        help = "Config file (YAML or JSON) overriding check thresholds"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CheckCommand,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        long = "base_url",
        env = "INMANTA_BASE_URL",
        help = "Base URL of the Inmanta server, e.g. http://172.30.0.3:8888/"
    )]
    pub base_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct EnvIdArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    #[arg(long = "env_id", help = "Environment ID to check")]
    pub env_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct EnvNameArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    #[arg(long = "env", help = "Environment name to check")]
    pub env: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CheckCommand {
    /// Critical when an agent is down or paused
    Agents(EnvIdArgs),
    /// Critical when an exporting compile failed recently
    Compiles(EnvIdArgs),
    /// Warning when an environment setting deviates from policy
    Env(EnvNameArgs),
    /// Critical when a resource failed to deploy
    Resources(EnvIdArgs),
    /// Critical when a service instance is in a danger state
    Services(EnvIdArgs),
}

impl CheckCommand {
    pub fn base_url(&self) -> &str {
        match self {
            CheckCommand::Agents(args)
            | CheckCommand::Compiles(args)
            | CheckCommand::Resources(args)
            | CheckCommand::Services(args) => args.server.base_url.as_str(),
            CheckCommand::Env(args) => args.server.base_url.as_str(),
        }
    }

    pub fn build(&self, config: &Config) -> Result<Box<dyn Check>, ConfigError> {
        Ok(match self {
            CheckCommand::Agents(args) => Box::new(AgentsCheck::new(args.env_id.clone())),
            CheckCommand::Compiles(args) => Box::new(CompilesCheck::within(
                args.env_id.clone(),
                config.compile_window(),
            )?),
            CheckCommand::Env(args) => Box::new(SettingsCheck::new(
                args.env.clone(),
                config.required_settings.clone(),
            )),
            CheckCommand::Resources(args) => Box::new(ResourcesCheck::new(
                args.env_id.clone(),
                config.resource_limit,
            )),
            CheckCommand::Services(args) => Box::new(ServicesCheck::new(args.env_id.clone())),
        })
    }
}

/// Run the selected check. Every failure path ends up as a result.
pub async fn execute(cli: Cli) -> CheckResult {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match config::load_config(path).await {
                Ok(config) => config,
                Err(e) => return CheckResult::unknown(format!("{:#}", e)),
            }
        }
        None => Config::default(),
    };

    let client = match InmantaClient::new(cli.command.base_url()) {
        Ok(client) => client,
        Err(e) => return CheckResult::from(e),
    };

    let check = match cli.command.build(&config) {
        Ok(check) => check,
        Err(e) => return CheckResult::unknown(format!("Invalid config: {}", e)),
    };
    run_check(check.as_ref(), &client).await
}

/// Collapse a clap error into the one-line reason, dropping usage hints.
pub fn usage_error_message(rendered: &str) -> String {
    rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
