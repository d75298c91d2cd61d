// src/client/inmanta.rs
use super::ClientError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Header that scopes a request to one environment.
pub const TENANT_HEADER: &str = "X-Inmanta-tid";

/// Every v2 and lsm endpoint wraps its payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Thin REST client for the orchestration server.
///
/// Requests are issued one at a time and only a `200 OK` counts as success.
#[derive(Debug, Clone)]
pub struct InmantaClient {
    base_url: Url,
    client: Client,
}

impl InmantaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an http(s) server root".to_string(),
            });
        }

        // Relative endpoints are appended to the base path.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("inmanta-checks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with the given path segments appended, each one escaped.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Link into the web console, e.g. `console/resources/<id>?env=<env>`.
    pub fn console_url(&self, path: &str) -> String {
        format!("{}console/{}", self.base_url, path)
    }

    /// GET `url` and decode the JSON body. `tenant` adds the environment header.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        tenant: Option<&str>,
    ) -> Result<T, ClientError> {
        debug!(url = %url, tenant = ?tenant, "GET");

        let mut request = self.client.get(url.clone());
        if let Some(tid) = tenant {
            request = request.header(TENANT_HEADER, tid);
        }

        // A header value that is not valid on the wire fails here, before
        // any connection is made.
        let response = request.send().await.map_err(|source| {
            if source.is_builder() {
                ClientError::Request {
                    url: url.to_string(),
                    source,
                }
            } else {
                self.transport(source)
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = %url, code = status.as_u16(), "unexpected status");
            return Err(ClientError::Status {
                code: status.as_u16(),
                base_url: self.base_url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|source| self.transport(source))?;

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// GET an endpoint whose payload sits under `data`.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        url: Url,
        tenant: Option<&str>,
    ) -> Result<T, ClientError> {
        let envelope: DataEnvelope<T> = self.get(url, tenant).await?;
        Ok(envelope.data)
    }

    fn transport(&self, source: reqwest::Error) -> ClientError {
        ClientError::Transport {
            base_url: self.base_url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = InmantaClient::new("http://172.30.0.3:8888/inmanta").unwrap();
        assert_eq!(client.base_url().as_str(), "http://172.30.0.3:8888/inmanta/");

        let client = InmantaClient::new("http://172.30.0.3:8888").unwrap();
        assert_eq!(client.base_url().as_str(), "http://172.30.0.3:8888/");
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = InmantaClient::new("http://localhost:8888/prefix/").unwrap();
        let url = client.endpoint(&["api", "v2", "agents"]);
        assert_eq!(url.as_str(), "http://localhost:8888/prefix/api/v2/agents");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = InmantaClient::new("http://localhost:8888/").unwrap();
        let url = client.endpoint(&["lsm", "v1", "service_inventory", "my service"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8888/lsm/v1/service_inventory/my%20service"
        );
    }

    #[test]
    fn test_console_url() {
        let client = InmantaClient::new("http://localhost:8888/").unwrap();
        assert_eq!(
            client.console_url("compilereports/42?env=e1"),
            "http://localhost:8888/console/compilereports/42?env=e1"
        );
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            InmantaClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            InmantaClient::new("mailto:ops@example.com"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_tenant_header_is_a_request_error() {
        let client = InmantaClient::new("http://127.0.0.1:1/").unwrap();
        let url = client.endpoint(&["api", "v2", "agents"]);
        let err = client
            .get::<serde_json::Value>(url, Some("e1\n"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Request { .. }));
        assert_eq!(err.status(), crate::nagios::Status::Unknown);
    }
}
