//! Vault gateway: member auth, record ingestion and semantic search over HTTP.
//!
//! ```text
//! client ──► /api/v1/auth ──► AccountService ──► Postgres (tenants, accounts)
//!        └─► /api/v1/vault ─► VaultService ──┬► Postgres + pgvector (vault_records)
//!              (bearer)                      ├► Redis LPUSH ml_queue
//!                                            └► embedding service
//! ```

pub mod api;
pub mod config;
pub mod health;
pub mod openapi;
pub mod state;

use axum::Router;
use core_config::{AppInfo, server::ServerConfig};
use domain_accounts::AccountRepository;
use domain_vault::VaultRepository;

use state::Services;

/// Full application router: API routes under `/api`, docs, `/health` and `/ready`.
pub fn build_router<A, V>(
    services: Services<A, V>,
    app_info: AppInfo,
    server: &ServerConfig,
) -> std::io::Result<Router>
where
    A: AccountRepository + 'static,
    V: VaultRepository + 'static,
{
    let probes = services.probes.clone();

    let extra = Router::new()
        .merge(axum_helpers::health_router(app_info))
        .merge(api::ready_router(probes));

    axum_helpers::create_router::<openapi::ApiDoc>(api::routes(services), extra, server)
}
