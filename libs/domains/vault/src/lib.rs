//! Vault domain: record ingestion onto the processing queue, status lookup and
//! semantic search backed by pgvector.

pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod queue;
pub mod repository;
pub mod service;

pub use config::{EmbeddingConfig, VaultConfig};
pub use embedding::{EmbeddingProvider, HttpEmbeddingClient};
pub use error::{VaultError, VaultResult};
pub use handlers::ApiDoc;
pub use models::{
    CollectRequest, CollectResponse, DistanceMetric, NewVaultRecord, ProcessingStatus,
    SearchHit, SearchQuery, SearchResponse, StatusResponse, VaultRecord,
};
pub use postgres::PgVaultRepository;
pub use queue::{InMemoryWorkQueue, RedisWorkQueue, WorkQueue};
pub use repository::{InMemoryVaultRepository, VaultRepository};
pub use service::{DEFAULT_STORE_TIMEOUT, VaultService};
