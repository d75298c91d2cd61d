// src/checks/resources.rs
use super::Check;
use crate::client::{ClientError, InmantaClient};
use crate::nagios::CheckResult;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub resource_id: String,
}

/// Escape a resource id for use as a console path component. `/` is kept.
pub fn escape_resource_id(id: &str) -> String {
    urlencoding::encode(id).replace("%2F", "/")
}

pub struct ResourcesCheck {
    env_id: String,
    limit: u32,
}

impl ResourcesCheck {
    pub fn new(env_id: impl Into<String>, limit: u32) -> Self {
        Self {
            env_id: env_id.into(),
            limit,
        }
    }

    pub fn query_url(&self, client: &InmantaClient) -> Url {
        let mut url = client.endpoint(&["api", "v2", "resource"]);
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string())
            .append_pair("filter.status", "failed")
            .append_pair("sort", "resource_type.asc");
        url
    }

    pub fn evaluate(&self, client: &InmantaClient, resources: &[Resource]) -> CheckResult {
        match resources.first() {
            Some(resource) => {
                debug!(resource = %resource.resource_id, "failed resource");
                let link = client.console_url(&format!(
                    "resources/{}?env={}",
                    escape_resource_id(&resource.resource_id),
                    self.env_id
                ));
                CheckResult::critical(format!("Failed deployment on {}", link))
            }
            None => CheckResult::ok("All deployments are successful"),
        }
    }
}

#[async_trait]
impl Check for ResourcesCheck {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError> {
        let resources: Vec<Resource> = client
            .get_data(self.query_url(client), Some(self.env_id.as_str()))
            .await?;
        Ok(self.evaluate(client, &resources))
    }

    fn name(&self) -> &'static str {
        "resources"
    }
}
