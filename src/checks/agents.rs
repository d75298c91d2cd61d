// src/checks/agents.rs
use super::Check;
use crate::client::{ClientError, InmantaClient};
use crate::nagios::CheckResult;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Agent {
    pub name: String,
    pub paused: bool,
    pub status: String,
}

impl Agent {
    /// A paused agent is never reported as down.
    pub fn is_down(&self) -> bool {
        !self.paused && self.status != "up"
    }
}

pub struct AgentsCheck {
    env_id: String,
}

impl AgentsCheck {
    pub fn new(env_id: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
        }
    }

    pub fn evaluate(&self, agents: &[Agent]) -> CheckResult {
        if let Some(agent) = agents.iter().find(|a| a.is_down()) {
            debug!(agent = %agent.name, status = %agent.status, "agent down");
            return CheckResult::critical(format!("Environment {}: Agent is down", self.env_id));
        }

        if let Some(agent) = agents.iter().find(|a| a.paused) {
            debug!(agent = %agent.name, "agent paused");
            return CheckResult::critical(format!(
                "Environment {}: Agent is paused",
                self.env_id
            ));
        }

        CheckResult::ok(format!("Environment {}: All agents are up", self.env_id))
    }
}

#[async_trait]
impl Check for AgentsCheck {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError> {
        let url = client.endpoint(&["api", "v2", "agents"]);
        let agents: Vec<Agent> = client.get_data(url, Some(self.env_id.as_str())).await?;
        Ok(self.evaluate(&agents))
    }

    fn name(&self) -> &'static str {
        "agents"
    }
}
