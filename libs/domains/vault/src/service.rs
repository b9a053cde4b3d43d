use axum_helpers::AuthIdentity;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::error::{VaultError, VaultResult};
use crate::models::{
    CollectResponse, NewVaultRecord, ProcessingStatus, SearchResponse, StatusResponse,
};
use crate::queue::WorkQueue;
use crate::repository::VaultRepository;

/// Results returned per search.
pub const SEARCH_LIMIT: u64 = 10;

/// Upper bound on one repository call unless overridden with `with_store_timeout`.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_DATA_TYPE_LEN: usize = 100;

const ACCEPTED_MESSAGE: &str = "Data accepted for processing";
const QUEUE_WARNING: &str =
    "Record stored but could not be queued; processing may be delayed";

/// Ingestion, status lookup and semantic search over a tenant's records.
pub struct VaultService<R: VaultRepository> {
    repository: Arc<R>,
    queue: Arc<dyn WorkQueue>,
    embedder: Arc<dyn EmbeddingProvider>,
    store_timeout: Duration,
}

impl<R: VaultRepository> Clone for VaultService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            queue: Arc::clone(&self.queue),
            embedder: Arc::clone(&self.embedder),
            store_timeout: self.store_timeout,
        }
    }
}

impl<R: VaultRepository> VaultService<R> {
    pub fn new(
        repository: R,
        queue: Arc<dyn WorkQueue>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            queue,
            embedder,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Run a repository call under the store deadline; running out of time is `Dependency`.
    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = VaultResult<T>>,
    ) -> VaultResult<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                VaultError::Dependency(format!(
                    "Store {} timed out after {:?}",
                    operation, self.store_timeout
                ))
            })?
    }

    /// Store a record for the caller, then queue it for processing.
    ///
    /// The record is persisted before the push. A failed push is reported as a warning and
    /// leaves the record `pending`.
    pub async fn collect(
        &self,
        identity: &AuthIdentity,
        data_type: &str,
        raw_data: Value,
    ) -> VaultResult<CollectResponse> {
        let data_type = data_type.trim();
        if data_type.is_empty() || data_type.chars().count() > MAX_DATA_TYPE_LEN {
            return Err(VaultError::Validation(format!(
                "data_type must be between 1 and {} characters",
                MAX_DATA_TYPE_LEN
            )));
        }
        if !(raw_data.is_object() || raw_data.is_array()) {
            return Err(VaultError::Validation(
                "data must be a JSON object or array".to_string(),
            ));
        }

        let insert = self.repository.insert(NewVaultRecord {
            account_id: identity.account_id,
            tenant_id: identity.tenant_id,
            data_type: data_type.to_string(),
            raw_data,
        });
        let record = self.bounded("insert", insert).await?;

        let warning = match self.queue.enqueue(&record.id.to_string()).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(record_id = %record.id, error = %e, "Record stored but not queued");
                Some(QUEUE_WARNING.to_string())
            }
        };

        Ok(CollectResponse {
            id: record.id,
            status: ProcessingStatus::Pending,
            message: ACCEPTED_MESSAGE.to_string(),
            warning,
        })
    }

    /// Status of a record visible to the caller. Ids that do not parse cannot name a
    /// record, so they are `NotFound` like any other miss.
    pub async fn get_status(&self, identity: &AuthIdentity, id: &str) -> VaultResult<StatusResponse> {
        let Ok(record_id) = Uuid::parse_str(id) else {
            return Err(VaultError::NotFound(id.to_string()));
        };

        let lookup = self.repository.find_status(identity.tenant_id, record_id);
        let status = self
            .bounded("status lookup", lookup)
            .await?
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;

        Ok(StatusResponse {
            id: record_id,
            status,
        })
    }

    /// Embed `query` and return the tenant's closest processed records.
    pub async fn search(&self, identity: &AuthIdentity, query: &str) -> VaultResult<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(VaultError::Validation("query must not be empty".to_string()));
        }

        let embedding = self.embedder.embed(query).await.map_err(|e| match e {
            VaultError::Dependency(_) => e,
            other => VaultError::Dependency(other.to_string()),
        })?;

        let ranked = self
            .repository
            .nearest(identity.tenant_id, embedding, SEARCH_LIMIT);
        let results = self.bounded("search", ranked).await?;

        tracing::debug!(tenant_id = %identity.tenant_id, hits = results.len(), "Search completed");
        Ok(SearchResponse { results })
    }
}
