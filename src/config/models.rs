// src/config/models.rs
use serde::Deserialize;
use serde_json::{json, Value};

/// Ten years; beyond that the compile report filter is meaningless.
pub const MAX_COMPILE_WINDOW_HOURS: i64 = 87_600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Page size of the failed-resources query.
    #[serde(default = "default_resource_limit")]
    pub resource_limit: u32,

    /// How far back the compiles check looks, in hours.
    #[serde(default = "default_compile_window_hours")]
    pub compile_window_hours: u32,

    /// Settings every environment must carry, checked in this order.
    #[serde(default = "default_required_settings")]
    pub required_settings: Vec<RequiredSetting>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequiredSetting {
    pub name: String,
    pub value: Value,
}

impl RequiredSetting {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("resource_limit must be greater than zero")]
    ZeroResourceLimit,

    #[error("compile_window_hours must be greater than zero")]
    ZeroCompileWindow,

    #[error(
        "compile_window_hours must be at most {max}, got {0}",
        max = MAX_COMPILE_WINDOW_HOURS
    )]
    CompileWindowTooLarge(i64),

    #[error("required_settings must not be empty")]
    NoRequiredSettings,

    #[error("required setting at position {0} has an empty name")]
    EmptySettingName(usize),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_limit: default_resource_limit(),
            compile_window_hours: default_compile_window_hours(),
            required_settings: default_required_settings(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_limit == 0 {
            return Err(ConfigError::ZeroResourceLimit);
        }
        if self.compile_window_hours == 0 {
            return Err(ConfigError::ZeroCompileWindow);
        }
        if i64::from(self.compile_window_hours) > MAX_COMPILE_WINDOW_HOURS {
            return Err(ConfigError::CompileWindowTooLarge(i64::from(
                self.compile_window_hours,
            )));
        }
        if self.required_settings.is_empty() {
            return Err(ConfigError::NoRequiredSettings);
        }
        if let Some(pos) = self
            .required_settings
            .iter()
            .position(|s| s.name.trim().is_empty())
        {
            return Err(ConfigError::EmptySettingName(pos));
        }
        Ok(())
    }

    pub fn compile_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.compile_window_hours))
    }
}

fn default_resource_limit() -> u32 {
    20
}

fn default_compile_window_hours() -> u32 {
    24
}

fn default_required_settings() -> Vec<RequiredSetting> {
    vec![
        RequiredSetting::new("auto_deploy", json!(true)),
        RequiredSetting::new("server_compile", json!(true)),
        RequiredSetting::new("purge_on_delete", json!(false)),
        RequiredSetting::new("push_on_auto_deploy", json!(true)),
        RequiredSetting::new("protected_environment", json!(true)),
        RequiredSetting::new(
            "agent_trigger_method_on_auto_deploy",
            json!("push_incremental_deploy"),
        ),
    ]
}
