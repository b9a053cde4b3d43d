//! # Axum Helpers
//!
//! Shared HTTP plumbing for the gateway.
//!
//! - **[`auth`]**: HS256 token issuing/verification and the bearer-token middleware
//! - **[`errors`]**: [`AppError`] and the uniform `{code, error, message, details}` envelope
//! - **[`extractors`]**: validated JSON bodies
//! - **[`http`]**: CORS and security-header layers
//! - **[`server`]**: router assembly, health/readiness probes, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AuthIdentity, IssuedToken, JwtConfig, TokenAuthority, TokenError, require_bearer,
};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::ValidatedJson;
pub use server::{
    HealthCheckFuture, HealthReport, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
