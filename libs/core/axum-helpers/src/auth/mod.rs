//! Bearer token authentication.
//!
//! [`TokenAuthority`] signs and verifies HS256 tokens; [`require_bearer`] guards routes and
//! exposes the caller's [`AuthIdentity`] to handlers.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtConfig, TokenAuthority, require_bearer};
//! use core_config::FromEnv;
//!
//! let authority = TokenAuthority::new(&JwtConfig::from_env()?);
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(authority, require_bearer));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use jwt::{AuthIdentity, IssuedToken, TokenAuthority, TokenError};
pub use middleware::require_bearer;
