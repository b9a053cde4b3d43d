//! Client for the external embedding service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::EmbeddingConfig;
use crate::error::{VaultError, VaultResult};

/// Turns text into a fixed-length vector.
///
/// Every failure is `VaultError::Dependency`; there is no degraded result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> VaultResult<Vec<f32>>;
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// `GET {base_url}/embed?text=...` returning `{"embedding": [...]}`.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    http: Client,
    base_url: String,
    dimension: usize,
}

impl HttpEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> VaultResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VaultError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            dimension: config.dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> VaultResult<Vec<f32>> {
        let response = self
            .http
            .get(format!("{}/embed", self.base_url))
            .query(&[("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Dependency(format!(
                "Embedding service returned {}: {}",
                status, body
            )));
        }

        let payload: EmbedResponse = response.json().await.map_err(|e| {
            VaultError::Dependency(format!("Malformed embedding response: {}", e))
        })?;

        if payload.embedding.len() != self.dimension {
            return Err(VaultError::Dependency(format!(
                "Embedding has {} dimensions, expected {}",
                payload.embedding.len(),
                self.dimension
            )));
        }

        tracing::debug!(dimension = self.dimension, "Embedded search query");
        Ok(payload.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &MockServer, dimension: usize) -> HttpEmbeddingClient {
        HttpEmbeddingClient::new(
            &EmbeddingConfig::new(server.base_url())
                .with_dimension(dimension)
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/embed").query_param("text", "hello world");
                then.status(200).json_body(json!({"embedding": [0.1, 0.2, 0.3]}));
            })
            .await;

        let embedding = client(&server, 3).embed("hello world").await.unwrap();

        mock.assert_async().await;
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_server_error_is_dependency() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/embed");
                then.status(500).body("model not loaded");
            })
            .await;

        let err = client(&server, 3).embed("q").await.unwrap_err();
        assert!(matches!(err, VaultError::Dependency(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_dependency() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/embed");
                then.status(200).json_body(json!({"vector": [1.0]}));
            })
            .await;

        let err = client(&server, 1).embed("q").await.unwrap_err();
        assert!(matches!(err, VaultError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_dependency() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/embed");
                then.status(200).json_body(json!({"embedding": [0.1, 0.2]}));
            })
            .await;

        let err = client(&server, 384).embed("q").await.unwrap_err();
        assert!(matches!(err, VaultError::Dependency(msg) if msg.contains("expected 384")));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/embed");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({"embedding": [0.1]}));
            })
            .await;

        let err = client(&server, 1).embed("q").await.unwrap_err();
        assert!(matches!(err, VaultError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_dependency() {
        let client = HttpEmbeddingClient::new(
            &EmbeddingConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let err = client.embed("q").await.unwrap_err();
        assert!(matches!(err, VaultError::Dependency(_)));
    }
}
