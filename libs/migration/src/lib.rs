pub use sea_orm_migration::prelude::*;

mod m20250101_000000_bootstrap;
mod m20250101_000001_create_tenants;
mod m20250101_000002_create_accounts;
mod m20250101_000003_create_vault_records;

/// Width of `vault_records.embedding`. Embeddings of any other length cannot be stored or
/// compared against it.
pub const EMBEDDING_DIMENSION: usize = 384;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000000_bootstrap::Migration),
            Box::new(m20250101_000001_create_tenants::Migration),
            Box::new(m20250101_000002_create_accounts::Migration),
            Box::new(m20250101_000003_create_vault_records::Migration),
        ]
    }
}
