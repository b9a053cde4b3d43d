use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::time::Duration;

use crate::models::DistanceMetric;

pub const DEFAULT_QUEUE_NAME: &str = "ml_queue";
/// The embedding column width; the service must produce vectors of exactly this length.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = migration::EMBEDDING_DIMENSION;

/// Ingestion queue and search ranking settings.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultConfig {
    pub queue_name: String,
    pub queue_timeout: Duration,
    pub distance: DistanceMetric,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            queue_timeout: Duration::from_millis(2000),
            distance: DistanceMetric::Cosine,
        }
    }
}

impl FromEnv for VaultConfig {
    /// - VAULT_QUEUE_NAME (default `ml_queue`)
    /// - QUEUE_TIMEOUT_MS (default 2000)
    /// - VAULT_DISTANCE: `cosine` or `l2`
    fn from_env() -> Result<Self, ConfigError> {
        let queue_name = env_or_default("VAULT_QUEUE_NAME", DEFAULT_QUEUE_NAME);
        if queue_name.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "VAULT_QUEUE_NAME".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            queue_name,
            queue_timeout: Duration::from_millis(env_parse("QUEUE_TIMEOUT_MS", 2000u64)?),
            distance: env_parse("VAULT_DISTANCE", DistanceMetric::Cosine)?,
        })
    }
}

/// Where and how to reach the embedding service.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub url: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl EmbeddingConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            timeout: Duration::from_millis(5000),
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FromEnv for EmbeddingConfig {
    /// - EMBEDDING_URL (default `http://localhost:8001`)
    /// - EMBEDDING_DIMENSION (default 384): must equal the `vault_records.embedding` width
    /// - EMBEDDING_TIMEOUT_MS (default 5000)
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("EMBEDDING_URL", "http://localhost:8001");
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_URL".to_string(),
                details: format!("expected an http(s) URL, got '{}'", url),
            });
        }

        let dimension = env_parse("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION)?;
        if dimension != DEFAULT_EMBEDDING_DIMENSION {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_DIMENSION".to_string(),
                details: format!(
                    "the embedding column holds {} dimensions, got {}",
                    DEFAULT_EMBEDDING_DIMENSION, dimension
                ),
            });
        }

        Ok(Self {
            url,
            dimension,
            timeout: Duration::from_millis(env_parse("EMBEDDING_TIMEOUT_MS", 5000u64)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_config_defaults() {
        temp_env::with_vars(
            [
                ("VAULT_QUEUE_NAME", None::<&str>),
                ("QUEUE_TIMEOUT_MS", None),
                ("VAULT_DISTANCE", None),
            ],
            || {
                let config = VaultConfig::from_env().unwrap();
                assert_eq!(config, VaultConfig::default());
            },
        );
    }

    #[test]
    fn test_vault_config_overrides() {
        temp_env::with_vars(
            [
                ("VAULT_QUEUE_NAME", Some("ingest")),
                ("QUEUE_TIMEOUT_MS", Some("250")),
                ("VAULT_DISTANCE", Some("l2")),
            ],
            || {
                let config = VaultConfig::from_env().unwrap();
                assert_eq!(config.queue_name, "ingest");
                assert_eq!(config.queue_timeout, Duration::from_millis(250));
                assert_eq!(config.distance, DistanceMetric::L2);
            },
        );
    }

    #[test]
    fn test_vault_config_rejects_unknown_metric() {
        temp_env::with_var("VAULT_DISTANCE", Some("manhattan"), || {
            let err = VaultConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { key, .. } if key == "VAULT_DISTANCE"));
        });
    }

    #[test]
    fn test_embedding_config_from_env() {
        temp_env::with_vars(
            [
                ("EMBEDDING_URL", Some("http://embedder:9000")),
                ("EMBEDDING_DIMENSION", Some("384")),
                ("EMBEDDING_TIMEOUT_MS", None),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.url, "http://embedder:9000");
                assert_eq!(config.dimension, 384);
                assert_eq!(config.timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_embedding_config_rejects_dimension_the_column_cannot_hold() {
        for dimension in ["768", "0"] {
            temp_env::with_vars(
                [
                    ("EMBEDDING_URL", None::<&str>),
                    ("EMBEDDING_DIMENSION", Some(dimension)),
                ],
                || {
                    let err = EmbeddingConfig::from_env().unwrap_err();
                    assert!(
                        matches!(err, ConfigError::ParseError { ref key, .. } if key == "EMBEDDING_DIMENSION")
                    );
                },
            );
        }
    }

    #[test]
    fn test_embedding_config_rejects_bad_url() {
        temp_env::with_var("EMBEDDING_URL", Some("embedder:9000"), || {
            assert!(EmbeddingConfig::from_env().is_err());
        });
    }
}
