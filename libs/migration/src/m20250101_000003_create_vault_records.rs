use sea_orm_migration::prelude::*;

use crate::EMBEDDING_DIMENSION;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Raw SQL: the schema builder has no vector column type.
        db.execute_unprepared(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS vault_records (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
                data_type VARCHAR(100) NOT NULL,
                raw_data JSONB NOT NULL,
                processing_status VARCHAR(16) NOT NULL DEFAULT 'pending'
                    CHECK (processing_status IN ('pending', 'processed', 'failed')),
                embedding vector({EMBEDDING_DIMENSION}),
                ai_summary TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ))
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_vault_records_tenant_id ON vault_records (tenant_id)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_vault_records_pending \
             ON vault_records (created_at) WHERE processing_status = 'pending'",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS vault_records")
            .await?;

        Ok(())
    }
}
