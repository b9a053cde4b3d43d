use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::VaultResult;
use crate::models::{DistanceMetric, NewVaultRecord, ProcessingStatus, SearchHit, VaultRecord};

/// Persistence and nearest-neighbour lookup for vault records.
///
/// Reads take the caller's tenant and never return another tenant's rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaultRepository: Send + Sync {
    /// Store a record with status `pending`.
    async fn insert(&self, input: NewVaultRecord) -> VaultResult<VaultRecord>;

    async fn find_status(&self, tenant_id: Uuid, id: Uuid)
    -> VaultResult<Option<ProcessingStatus>>;

    /// Up to `limit` embedded records of the tenant, closest first.
    async fn nearest(
        &self,
        tenant_id: Uuid,
        embedding: Vec<f32>,
        limit: u64,
    ) -> VaultResult<Vec<SearchHit>>;
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: VaultRecord,
    embedding: Option<Vec<f32>>,
}

/// In-memory implementation of VaultRepository (for development/testing)
#[derive(Debug, Clone, Default)]
pub struct InMemoryVaultRepository {
    records: Arc<RwLock<HashMap<Uuid, StoredRecord>>>,
    metric: DistanceMetric,
}

impl InMemoryVaultRepository {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            records: Arc::default(),
            metric,
        }
    }

    /// Do what the processing worker does: attach an embedding and summary.
    pub async fn mark_processed(&self, id: Uuid, embedding: Vec<f32>, summary: &str) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(stored) => {
                stored.embedding = Some(embedding);
                stored.record.ai_summary = Some(summary.to_string());
                stored.record.processing_status = ProcessingStatus::Processed;
                true
            }
            None => false,
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl VaultRepository for InMemoryVaultRepository {
    async fn insert(&self, input: NewVaultRecord) -> VaultResult<VaultRecord> {
        let record = VaultRecord {
            id: Uuid::now_v7(),
            account_id: input.account_id,
            tenant_id: input.tenant_id,
            data_type: input.data_type,
            raw_data: input.raw_data,
            processing_status: ProcessingStatus::Pending,
            ai_summary: None,
            created_at: Utc::now(),
        };

        self.records.write().await.insert(
            record.id,
            StoredRecord {
                record: record.clone(),
                embedding: None,
            },
        );

        Ok(record)
    }

    async fn find_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> VaultResult<Option<ProcessingStatus>> {
        let records = self.records.read().await;
        Ok(records
            .get(&id)
            .filter(|stored| stored.record.tenant_id == tenant_id)
            .map(|stored| stored.record.processing_status))
    }

    async fn nearest(
        &self,
        tenant_id: Uuid,
        embedding: Vec<f32>,
        limit: u64,
    ) -> VaultResult<Vec<SearchHit>> {
        let records = self.records.read().await;

        let mut scored: Vec<(f32, &VaultRecord)> = records
            .values()
            .filter(|stored| stored.record.tenant_id == tenant_id)
            .filter_map(|stored| {
                let candidate = stored.embedding.as_ref()?;
                Some((self.metric.distance(&embedding, candidate), &stored.record))
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(_, record)| SearchHit {
                id: record.id,
                data: record.raw_data.clone(),
                summary: record.ai_summary.clone(),
            })
            .collect())
    }
}
