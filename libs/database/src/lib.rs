//! Connection plumbing for the gateway's backing stores.
//!
//! - `postgres` (default): SeaORM connection pool, migrations, health probe
//! - `redis` (default): `ConnectionManager` for the work queue, health probe
//!
//! Every connector has a `*_with_retry` variant that applies exponential backoff,
//! which is what `main` uses at startup so the gateway tolerates a database that
//! comes up a few seconds after it.
//!
//! ```ignore
//! use database::{RetryConfig, postgres, redis};
//!
//! let db = postgres::connect_from_config_with_retry(pg_config, RetryConfig::default()).await?;
//! let queue = redis::connect_from_config_with_retry(redis_config, RetryConfig::default()).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
