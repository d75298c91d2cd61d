// src/nagios/mod.rs
mod result;

pub use result::CheckResult;

/// Plugin service state: `exit_code()` gives 0..=3, `Display` the upper-case name.
pub use nagiosplugin::ServiceState as Status;
