// src/checks/runner.rs
use super::Check;
use crate::client::InmantaClient;
use crate::nagios::CheckResult;
use tracing::debug;

/// Run `check` and fold any client error into a result, so the caller
/// always has exactly one status line to print.
pub async fn run_check(check: &dyn Check, client: &InmantaClient) -> CheckResult {
    debug!(check = check.name(), base_url = %client.base_url(), "running check");

    match check.run(client).await {
        Ok(result) => {
            debug!(check = check.name(), status = %result.status, "check finished");
            result
        }
        Err(e) => {
            debug!(check = check.name(), error = %e, "check could not complete");
            CheckResult::from(e)
        }
    }
}
