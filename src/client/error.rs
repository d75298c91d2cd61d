// src/client/error.rs
use crate::nagios::{CheckResult, Status};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Invalid request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to connect to {base_url}: {source}")]
    Transport {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Received HTTP code {code} while connecting to {base_url}")]
    Status { code: u16, base_url: String },

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Server unreachable or unhappy is a failing condition; anything we
    /// could not make sense of is not.
    pub fn status(&self) -> Status {
        match self {
            ClientError::Transport { .. } | ClientError::Status { .. } => Status::Critical,
            ClientError::InvalidBaseUrl { .. }
            | ClientError::Build(_)
            | ClientError::Request { .. }
            | ClientError::Decode { .. } => Status::Unknown,
        }
    }
}

impl From<ClientError> for CheckResult {
    fn from(err: ClientError) -> Self {
        CheckResult::new(err.status(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_maps_to_critical() {
        let err = ClientError::Status {
            code: 503,
            base_url: "http://172.30.0.3:8888/".to_string(),
        };
        let result = CheckResult::from(err);
        assert_eq!(result.status, Status::Critical);
        assert_eq!(
            result.message,
            "Received HTTP code 503 while connecting to http://172.30.0.3:8888/"
        );
    }

    #[test]
    fn test_decode_error_maps_to_unknown() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::Decode {
            url: "http://localhost/api/v2/agents".to_string(),
            source,
        };
        let result = CheckResult::from(err);
        assert_eq!(result.status, Status::Unknown);
        assert!(result
            .message
            .starts_with("Unexpected response from http://localhost/api/v2/agents"));
    }

    #[test]
    fn test_invalid_base_url_maps_to_unknown() {
        let err = ClientError::InvalidBaseUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(err.status(), Status::Unknown);
    }
}
