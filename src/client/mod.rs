// src/client/mod.rs
mod error;
mod inmanta;

pub use error::ClientError;
pub use inmanta::{DataEnvelope, InmantaClient, TENANT_HEADER};
