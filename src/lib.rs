// src/lib.rs
pub mod checks;
pub mod cli;
pub mod client;
pub mod config;
pub mod nagios;

pub use nagios::{CheckResult, Status};
