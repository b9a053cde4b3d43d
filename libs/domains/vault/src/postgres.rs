use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::error::{VaultError, VaultResult};
use crate::models::{DistanceMetric, NewVaultRecord, ProcessingStatus, SearchHit, VaultRecord};
use crate::repository::VaultRepository;

/// PostgreSQL + pgvector implementation of VaultRepository
#[derive(Clone)]
pub struct PgVaultRepository {
    db: DatabaseConnection,
    metric: DistanceMetric,
}

impl PgVaultRepository {
    pub fn new(db: DatabaseConnection, metric: DistanceMetric) -> Self {
        Self { db, metric }
    }
}

#[derive(Debug, FromQueryResult)]
struct RecordRow {
    id: Uuid,
    account_id: Uuid,
    tenant_id: Uuid,
    data_type: String,
    raw_data: Json,
    processing_status: String,
    ai_summary: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecordRow> for VaultRecord {
    type Error = VaultError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        Ok(VaultRecord {
            id: row.id,
            account_id: row.account_id,
            tenant_id: row.tenant_id,
            data_type: row.data_type,
            raw_data: row.raw_data,
            processing_status: row.processing_status.parse().map_err(VaultError::Internal)?,
            ai_summary: row.ai_summary,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    processing_status: String,
}

#[derive(Debug, FromQueryResult)]
struct HitRow {
    id: Uuid,
    raw_data: Json,
    ai_summary: Option<String>,
}

fn store_error(e: DbErr) -> VaultError {
    VaultError::Dependency(format!("Database error: {}", e))
}

/// pgvector text literal, e.g. `[0.1,0.2]`.
fn vector_literal(embedding: &[f32]) -> String {
    let parts: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

#[async_trait]
impl VaultRepository for PgVaultRepository {
    async fn insert(&self, input: NewVaultRecord) -> VaultResult<VaultRecord> {
        let sql = r#"
            INSERT INTO vault_records (account_id, tenant_id, data_type, raw_data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, tenant_id, data_type, raw_data,
                      processing_status, ai_summary, created_at
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                input.account_id.into(),
                input.tenant_id.into(),
                input.data_type.into(),
                input.raw_data.into(),
            ],
        );

        let row = RecordRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| VaultError::Internal("Record insert returned no row".to_string()))?;

        let record = VaultRecord::try_from(row)?;
        tracing::info!(record_id = %record.id, tenant_id = %record.tenant_id, "Stored vault record");
        Ok(record)
    }

    async fn find_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> VaultResult<Option<ProcessingStatus>> {
        let sql = "SELECT processing_status FROM vault_records WHERE id = $1 AND tenant_id = $2";
        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into(), tenant_id.into()]);

        StatusRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(|row| row.processing_status.parse().map_err(VaultError::Internal))
            .transpose()
    }

    async fn nearest(
        &self,
        tenant_id: Uuid,
        embedding: Vec<f32>,
        limit: u64,
    ) -> VaultResult<Vec<SearchHit>> {
        // The operator comes from a closed enum; values stay bound.
        let sql = format!(
            r#"
            SELECT id, raw_data, ai_summary
            FROM vault_records
            WHERE tenant_id = $1 AND embedding IS NOT NULL
            ORDER BY embedding {} $2::vector
            LIMIT $3
            "#,
            self.metric.operator()
        );

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                tenant_id.into(),
                vector_literal(&embedding).into(),
                limit.into(),
            ],
        );

        let rows = HitRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|row| SearchHit {
                id: row.id,
                data: row.raw_data,
                summary: row.ai_summary,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, Value};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn hit_row(id: Uuid, summary: Option<&str>) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Value::from(id)),
            ("raw_data", Value::from(json!({"text": "hi"}))),
            ("ai_summary", Value::from(summary.map(str::to_string))),
        ])
    }

    #[test]
    fn test_vector_literal() {
        assert_eq!(vector_literal(&[0.5, -1.0, 2.0]), "[0.5,-1,2]");
        assert_eq!(vector_literal(&[]), "[]");
    }

    #[tokio::test]
    async fn test_nearest_uses_metric_operator_and_tenant_filter() {
        let tenant = Uuid::now_v7();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![hit_row(first, Some("summary")), hit_row(second, None)]])
            .into_connection();
        let repo = PgVaultRepository::new(db.clone(), DistanceMetric::L2);

        let hits = repo.nearest(tenant, vec![0.5, 0.25], 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, first);
        assert_eq!(hits[0].summary.as_deref(), Some("summary"));
        assert_eq!(hits[1].summary, None);

        let log = db.into_transaction_log();
        let statement = format!("{:?}", log[0]);
        assert!(statement.contains("embedding <-> $2::vector"));
        assert!(statement.contains("tenant_id = $1"));
        assert!(statement.contains("[0.5,0.25]"));
    }

    #[tokio::test]
    async fn test_find_status_parses_status() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "processing_status",
                Value::from("processed".to_string()),
            )])]])
            .into_connection();
        let repo = PgVaultRepository::new(db, DistanceMetric::Cosine);

        let status = repo.find_status(Uuid::now_v7(), Uuid::now_v7()).await.unwrap();
        assert_eq!(status, Some(ProcessingStatus::Processed));
    }

    #[tokio::test]
    async fn test_find_status_missing_row() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PgVaultRepository::new(db, DistanceMetric::Cosine);

        assert_eq!(repo.find_status(Uuid::now_v7(), Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_failure_is_dependency() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgVaultRepository::new(db, DistanceMetric::Cosine);

        let err = repo
            .insert(NewVaultRecord {
                account_id: Uuid::now_v7(),
                tenant_id: Uuid::now_v7(),
                data_type: "note".into(),
                raw_data: json!({"text": "hi"}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Dependency(_)));
    }
}
