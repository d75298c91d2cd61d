// src/checks/mod.rs
mod agents;
mod compiles;
mod resources;
mod runner;
mod services;
mod settings;

pub use agents::{Agent, AgentsCheck};
pub use compiles::{CompileReport, CompilesCheck};
pub use resources::{escape_resource_id, Resource, ResourcesCheck};
pub use runner::run_check;
pub use services::{LifecycleState, ServiceEntity, ServiceInstance, ServicesCheck};
pub use settings::{Environment, EnvironmentSettings, SettingDefinition, SettingsCheck};

use crate::client::{ClientError, InmantaClient};
use crate::nagios::CheckResult;
use async_trait::async_trait;

/// One Nagios check against the server API.
///
/// Implementations stop at the first failing item in server order and
/// return it; they never aggregate.
#[async_trait]
pub trait Check: Send + Sync {
    async fn run(&self, client: &InmantaClient) -> Result<CheckResult, ClientError>;

    fn name(&self) -> &'static str;
}
