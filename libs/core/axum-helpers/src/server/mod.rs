//! Router assembly, probes and graceful shutdown.
//!
//! ```ignore
//! let extra = health_router(app_info!()).merge(ready_routes);
//! let router = create_router::<ApiDoc>(api_routes, extra, &server_config)?;
//! create_production_app(router, &server_config, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthReport, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
