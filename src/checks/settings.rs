// src/checks/settings.rs
use super::Check;
use crate::client::{ClientError, InmantaClient};
use crate::config::RequiredSetting;
use crate::nagios::CheckResult;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct EnvironmentList {
    environments: Vec<Environment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingDefinition {
    pub name: String,
    #[serde(default)]
    pub default: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentSettings {
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub definition: HashMap<String, SettingDefinition>,
}

impl EnvironmentSettings {
    /// Definition defaults overlaid with the explicitly set values.
    pub fn effective(&self) -> HashMap<String, Value> {
        let mut values: HashMap<String, Value> = self
            .definition
            .values()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect();
        values.extend(self.settings.iter().map(|(k, v)| (k.clone(), v.clone())));
        values
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        None => "unset".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Resolves an environment by name, then compares its settings against the
/// required values. A mismatch is a warning, not a failure.
pub struct SettingsCheck {
    env_name: String,
    required: Vec<RequiredSetting>,
}

impl SettingsCheck {
    pub fn new(env_name: impl Into<String>, required: Vec<RequiredSetting>) -> Self {
        Self {
            env_name: env_name.into(),
            required,
        }
    }

    pub fn find_environment<'a>(&self, environments: &'a [Environment]) -> Option<&'a Environment> {
        environments.iter().find(|e| e.name == self.env_name)
    }

    pub fn evaluate(&self, env: &Environment, settings: &EnvironmentSettings) -> CheckResult {
        let values = settings.effective();

        for required in &self.required {
            let actual = values.get(&required.name);
            if actual != Some(&required.value) {
                debug!(setting = %required.name, "setting mismatch");
                return CheckResult::warning(format!(
                    "Environment {}: Setting {} should be {} but is {} | Environment ID: {}",
                    env.name,
                    required.name,
                    render(Some(&required.value)),
                    render(actual),
                    env.id
                ));
            }
        }

        CheckResult::ok(format!(
            "Environment {}: All settings are correct | Environment ID: {}",
            env.name, env.id
        ))
    }
}

#[async_trait]
impl Check for SettingsCheck {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError> {
        // The listing spans all environments, so it is not tenant scoped.
        let list: EnvironmentList = client
            .get(client.endpoint(&["api", "v1", "environment"]), None)
            .await?;

        let env = match self.find_environment(&list.environments) {
            Some(env) => env,
            None => {
                return Ok(CheckResult::critical(format!(
                    "Environment {} not found",
                    self.env_name
                )))
            }
        };
        debug!(name = %env.name, id = %env.id, "resolved environment");

        let settings: EnvironmentSettings = client
            .get_data(
                client.endpoint(&["api", "v2", "environment_settings"]),
                Some(env.id.as_str()),
            )
            .await?;

        Ok(self.evaluate(env, &settings))
    }

    fn name(&self) -> &'static str {
        "env"
    }
}
