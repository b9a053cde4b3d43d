use axum::{Router, middleware, routing::get};
use axum_helpers::require_bearer;
use domain_accounts::AccountRepository;
use domain_vault::VaultRepository;

use crate::health::Probes;
use crate::state::Services;

pub mod admin;

/// API routes without the `/api` prefix, which `create_router` adds.
///
/// `/v1/auth/*` is public; `/v1/vault/*` and `/v1/admin/*` require a bearer token.
pub fn routes<A, V>(services: Services<A, V>) -> Router
where
    A: AccountRepository + 'static,
    V: VaultRepository + 'static,
{
    let protected = Router::new()
        .nest("/vault", domain_vault::handlers::router(services.vault))
        .nest("/admin", admin::router(services.probes))
        .route_layer(middleware::from_fn_with_state(
            services.tokens,
            require_bearer,
        ));

    let v1 = Router::new()
        .nest("/auth", domain_accounts::handlers::router(services.accounts))
        .merge(protected);

    Router::new().nest("/v1", v1)
}

/// Readiness probe at `/ready`, outside the `/api` prefix.
pub fn ready_router(probes: Probes) -> Router {
    Router::new()
        .route("/ready", get(admin::ready_handler))
        .with_state(probes)
}
