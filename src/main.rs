// src/main.rs
use clap::error::ErrorKind;
use clap::Parser;
use inmanta_checks::cli::{self, Cli};
use inmanta_checks::CheckResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// One request at a time, then exit: a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing. Stdout carries the status line, so logs go to stderr,
    // and some executors merge stderr into the plugin output: stay quiet by default.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("inmanta_checks=error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            // Bad invocation is UNKNOWN to the monitoring daemon, not CRITICAL.
            _ => {
                return CheckResult::unknown(cli::usage_error_message(&err.to_string())).emit()
            }
        },
    };

    cli::execute(cli).await.emit()
}
