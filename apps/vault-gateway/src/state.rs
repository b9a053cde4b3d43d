//! Connections opened at startup and the services built from them.

use axum_helpers::TokenAuthority;
use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use domain_accounts::{AccountRepository, AccountService, PasswordHasher, PgAccountRepository};
use domain_vault::{
    HttpEmbeddingClient, PgVaultRepository, RedisWorkQueue, VaultRepository, VaultService,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::health::{PostgresProbe, Probes, RedisProbe};

/// Process-wide state: configuration plus pooled clients, all cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
    pub redis: ConnectionManager,
}

/// Everything the HTTP layer needs, independent of which stores back it.
pub struct Services<A: AccountRepository, V: VaultRepository> {
    pub accounts: AccountService<A>,
    pub vault: VaultService<V>,
    pub tokens: TokenAuthority,
    pub probes: Probes,
}

impl AppState {
    pub fn services(&self) -> eyre::Result<Services<PgAccountRepository, PgVaultRepository>> {
        let tokens = TokenAuthority::new(&self.config.jwt);
        let hasher = PasswordHasher::new(&self.config.hasher)?;
        let store_timeout = Duration::from_secs(self.config.database.query_timeout_secs);

        let accounts = AccountService::new(
            PgAccountRepository::new(self.db.clone()),
            hasher,
            tokens.clone(),
        )
        .with_store_timeout(store_timeout);

        let queue = RedisWorkQueue::new(
            self.redis.clone(),
            self.config.vault.queue_name.clone(),
            self.config.vault.queue_timeout,
        );
        let embedder = HttpEmbeddingClient::new(&self.config.embedding)
            .map_err(|e| eyre::eyre!("Failed to build embedding client: {}", e))?;

        let vault = VaultService::new(
            PgVaultRepository::new(self.db.clone(), self.config.vault.distance),
            Arc::new(queue),
            Arc::new(embedder),
        )
        .with_store_timeout(store_timeout);

        Ok(Services {
            accounts,
            vault,
            tokens,
            probes: Probes {
                database: Arc::new(PostgresProbe(self.db.clone())),
                redis: Arc::new(RedisProbe(self.redis.clone())),
            },
        })
    }
}
