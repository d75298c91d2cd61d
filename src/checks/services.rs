// src/checks/services.rs
use super::Check;
use crate::client::{ClientError, InmantaClient};
use crate::nagios::CheckResult;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const DANGER_LABEL: &str = "danger";

#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleState {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lifecycle {
    pub states: Vec<LifecycleState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntity {
    pub name: String,
    pub lifecycle: Lifecycle,
}

impl ServiceEntity {
    /// States the lifecycle marks as needing operator attention.
    pub fn danger_states(&self) -> Vec<&str> {
        self.lifecycle
            .states
            .iter()
            .filter(|s| s.label.as_deref() == Some(DANGER_LABEL))
            .map(|s| s.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInstance {
    pub id: String,
    #[serde(default)]
    pub service_identity_attribute_value: Option<String>,
}

impl ServiceInstance {
    pub fn identity(&self) -> &str {
        match self.service_identity_attribute_value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => &self.id,
        }
    }
}

/// Walks the service catalog and reports the first instance sitting in a
/// danger state of its own lifecycle.
pub struct ServicesCheck {
    env_id: String,
}

impl ServicesCheck {
    pub fn new(env_id: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
        }
    }

    pub fn inventory_url(&self, client: &InmantaClient, service: &ServiceEntity) -> Url {
        let mut url = client.endpoint(&["lsm", "v1", "service_inventory", service.name.as_str()]);
        {
            let mut query = url.query_pairs_mut();
            for state in service.danger_states() {
                query.append_pair("filter.state", state);
            }
        }
        url
    }

    pub fn evaluate(
        &self,
        client: &InmantaClient,
        service: &str,
        instances: &[ServiceInstance],
    ) -> Option<CheckResult> {
        instances.first().map(|instance| {
            debug!(service, instance = %instance.id, "failed service instance");
            let link = client.console_url(&format!(
                "lsm/catalog/{}/inventory/{}/diagnose?env={}",
                service, instance.id, self.env_id
            ));
            CheckResult::critical(format!(
                "Service failed for {} {}: {}",
                service,
                instance.identity(),
                link
            ))
        })
    }
}

#[async_trait]
impl Check for ServicesCheck {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError> {
        let catalog: Vec<ServiceEntity> = client
            .get_data(
                client.endpoint(&["lsm", "v1", "service_catalog"]),
                Some(self.env_id.as_str()),
            )
            .await?;

        for service in &catalog {
            // An empty state filter would list every instance.
            if service.danger_states().is_empty() {
                debug!(service = %service.name, "no danger states, skipping");
                continue;
            }

            let instances: Vec<ServiceInstance> = client
                .get_data(self.inventory_url(client, service), Some(self.env_id.as_str()))
                .await?;

            if let Some(result) = self.evaluate(client, &service.name, &instances) {
                return Ok(result);
            }
        }

        Ok(CheckResult::ok("All services are fine"))
    }

    fn name(&self) -> &'static str {
        "services"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nagios::Status;
    use serde_json::json;

    fn client() -> InmantaClient {
        InmantaClient::new("http://localhost:8888/").unwrap()
    }

    fn entity() -> ServiceEntity {
        serde_json::from_value(json!({
            "name": "vlan",
            "lifecycle": {
                "states": [
                    {"name": "up", "label": "success"},
                    {"name": "failed", "label": "danger"},
                    {"name": "start"},
                    {"name": "rejected", "label": "danger"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_danger_states_follow_lifecycle_order() {
        assert_eq!(entity().danger_states(), vec!["failed", "rejected"]);
    }

    #[test]
    fn test_inventory_url_filters_on_danger_states() {
        let url = ServicesCheck::new("e1").inventory_url(&client(), &entity());
        assert_eq!(
            url.as_str(),
            "http://localhost:8888/lsm/v1/service_inventory/vlan?filter.state=failed&filter.state=rejected"
        );
    }

    #[test]
    fn test_identity_falls_back_to_id() {
        let named = ServiceInstance {
            id: "i1".to_string(),
            service_identity_attribute_value: Some("vlan-100".to_string()),
        };
        let blank = ServiceInstance {
            id: "i2".to_string(),
            service_identity_attribute_value: Some(String::new()),
        };
        let missing = ServiceInstance {
            id: "i3".to_string(),
            service_identity_attribute_value: None,
        };
        assert_eq!(named.identity(), "vlan-100");
        assert_eq!(blank.identity(), "i2");
        assert_eq!(missing.identity(), "i3");
    }

    #[test]
    fn test_first_instance_is_reported() {
        let instances = vec![
            ServiceInstance {
                id: "i1".to_string(),
                service_identity_attribute_value: None,
            },
            ServiceInstance {
                id: "i2".to_string(),
                service_identity_attribute_value: None,
            },
        ];
        let result = ServicesCheck::new("e1")
            .evaluate(&client(), "vlan", &instances)
            .unwrap();
        assert_eq!(result.status, Status::Critical);
        assert_eq!(
            result.message,
            "Service failed for vlan i1: http://localhost:8888/console/lsm/catalog/vlan/inventory/i1/diagnose?env=e1"
        );
    }

    #[test]
    fn test_no_instances_means_no_result() {
        assert!(ServicesCheck::new("e1")
            .evaluate(&client(), "vlan", &[])
            .is_none());
    }
}
