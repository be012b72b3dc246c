//! HTTP client for fetching compiled artifacts from a remote endpoint

use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::core::artifact_store::ArtifactStore;
use crate::core::concrete::GeneratedNode;

#[derive(Debug, Error)]
pub enum ArtifactClientError {
    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Server returned error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

#[derive(Clone)]
pub struct ArtifactClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ArtifactClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Get the base URL for this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<R>(&self, method: Method, url: &str) -> Result<R, ArtifactClientError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let mut request = self.client.request(method, url);

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ArtifactClientError::ServerError { status, message });
        }

        let result = response.json().await?;
        Ok(result)
    }

    /// Helper to resolve URL (full URL or relative endpoint)
    fn resolve_url(&self, url_or_endpoint: &str) -> String {
        if url_or_endpoint.starts_with("http://") || url_or_endpoint.starts_with("https://") {
            url_or_endpoint.to_string()
        } else {
            let base = self.base_url.trim_end_matches('/');
            let endpoint = url_or_endpoint.trim_start_matches('/');
            format!("{base}/{endpoint}")
        }
    }

    pub async fn get<R>(&self, url_or_endpoint: &str) -> Result<R, ArtifactClientError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let url = self.resolve_url(url_or_endpoint);
        self.request(Method::GET, &url).await
    }

    /// Fetch `{base}/artifacts` into a store.
    ///
    /// Entries are decoded one at a time so a malformed artifact becomes a load error.
    pub async fn fetch_artifacts(&self) -> Result<ArtifactStore, ArtifactClientError> {
        let entries: Vec<Value> = self.get("artifacts").await?;
        Ok(store_from_entries(entries, self.base_url()))
    }
}

fn store_from_entries(entries: Vec<Value>, origin: &str) -> ArtifactStore {
    let mut store = ArtifactStore::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let source = format!("{origin}/artifacts[{index}]");
        if let Err(e) = GeneratedNode::from_value(entry).and_then(|node| store.insert(node, None)) {
            warn!(source = %source, error = %e, "skipping remote artifact");
            store.record_load_error(source, e.to_string());
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resolve_url_relative_endpoint() {
        let client = ArtifactClient::new("http://localhost:4000", None);

        let result = client.resolve_url("artifacts");
        assert_eq!(result, "http://localhost:4000/artifacts");

        let result = client.resolve_url("artifacts?kind=Request");
        assert_eq!(result, "http://localhost:4000/artifacts?kind=Request");
    }

    #[test]
    fn test_resolve_url_relative_endpoint_with_leading_slash() {
        let client = ArtifactClient::new("http://localhost:4000", None);

        let result = client.resolve_url("/artifacts");
        assert_eq!(result, "http://localhost:4000/artifacts");
    }

    #[test]
    fn test_resolve_url_full_url() {
        let client = ArtifactClient::new("http://localhost:4000", None);

        let result = client.resolve_url("https://cdn.example.com/relay/artifacts");
        assert_eq!(result, "https://cdn.example.com/relay/artifacts");
    }

    #[test]
    fn test_resolve_url_base_url_with_trailing_slash() {
        let client = ArtifactClient::new("http://localhost:4000/", None);

        assert_eq!(client.resolve_url("artifacts"), "http://localhost:4000/artifacts");
        assert_eq!(client.resolve_url("/artifacts"), "http://localhost:4000/artifacts");
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let client = ArtifactClient::new("http://localhost:4000", Some("  ".to_string()));
        assert!(client.api_key.is_none());

        let client = ArtifactClient::new("http://localhost:4000", Some("secret".to_string()));
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_store_from_entries_keeps_bad_entries_as_errors() {
        let entries = vec![
            json!({"kind": "InlineDataFragment", "name": "Story_data"}),
            json!({"kind": "LinkedField", "name": "oops"}),
            json!({"kind": "InlineDataFragment", "name": "Story_data"}),
        ];

        let store = store_from_entries(entries, "http://localhost:4000");
        assert_eq!(store.len(), 1);
        assert_eq!(store.load_errors().len(), 2);
        assert_eq!(store.load_errors()[0].source, "http://localhost:4000/artifacts[1]");
        assert!(store.load_errors()[1].message.contains("Duplicate artifact name"));
    }

    #[tokio::test]
    async fn test_fetch_artifacts_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artifacts"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"kind": "InlineDataFragment", "name": "Story_data"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ArtifactClient::new(server.uri(), Some("secret".to_string()));
        let store = client.fetch_artifacts().await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("Story_data").is_some());
        assert!(store.load_errors().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_artifacts_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artifacts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let client = ArtifactClient::new(server.uri(), None);
        match client.fetch_artifacts().await {
            Err(ArtifactClientError::ServerError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "down for maintenance");
            }
            other => panic!("Expected server error, got {:?}", other.map(|store| store.len())),
        }
    }
}
