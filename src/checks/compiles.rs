// src/checks/compiles.rs
use super::Check;
use crate::client::{ClientError, InmantaClient};
use crate::config::ConfigError;
use crate::nagios::CheckResult;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Naive UTC timestamp with microseconds, as the server's filters expect.
const REQUESTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Deserialize)]
pub struct CompileReport {
    pub id: String,
    pub do_export: bool,
}

/// Looks for failed compiles that were meant to export resources.
pub struct CompilesCheck {
    env_id: String,
    since: NaiveDateTime,
}

impl CompilesCheck {
    pub fn new(env_id: impl Into<String>, since: NaiveDateTime) -> Self {
        Self {
            env_id: env_id.into(),
            since,
        }
    }

    /// Compiles requested within `window` of now. Fails when the window
    /// reaches past the earliest representable timestamp.
    pub fn within(env_id: impl Into<String>, window: Duration) -> Result<Self, ConfigError> {
        let since = Utc::now()
            .naive_utc()
            .checked_sub_signed(window)
            .ok_or_else(|| ConfigError::CompileWindowTooLarge(window.num_hours()))?;
        Ok(Self::new(env_id, since))
    }

    pub fn query_url(&self, client: &InmantaClient) -> Url {
        let mut url = client.endpoint(&["api", "v2", "compilereport"]);
        url.query_pairs_mut()
            .append_pair("filter.success", "False")
            .append_pair(
                "filter.requested",
                &format!("ge:{}", self.since.format(REQUESTED_FORMAT)),
            );
        url
    }

    pub fn evaluate(&self, client: &InmantaClient, reports: &[CompileReport]) -> CheckResult {
        match reports.iter().find(|r| r.do_export) {
            Some(report) => {
                debug!(compile = %report.id, "failed exporting compile");
                let link = client.console_url(&format!(
                    "compilereports/{}?env={}",
                    report.id, self.env_id
                ));
                CheckResult::critical(format!("Compile failed: {}", link))
            }
            None => CheckResult::ok("All compiles are succeeding"),
        }
    }
}

#[async_trait]
impl Check for CompilesCheck {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError> {
        let reports: Vec<CompileReport> = client
            .get_data(self.query_url(client), Some(self.env_id.as_str()))
            .await?;
        Ok(self.evaluate(client, &reports))
    }

    fn name(&self) -> &'static str {
        "compiles"
    }
}
