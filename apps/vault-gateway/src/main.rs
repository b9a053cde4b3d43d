use axum_helpers::create_production_app;
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use std::time::Duration;
use tracing::info;

use vault_gateway::{build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup errors are reported in color
    install_color_eyre();
    load_dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(
            config.database.clone(),
            RetryConfig::default(),
        )
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(config.redis.clone(), RetryConfig::default())
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState { config, db, redis };
    let services = state.services()?;
    let server = state.config.server.clone();
    let app = build_router(services, state.config.app.clone(), &server)?;

    info!(
        queue = %state.config.vault.queue_name,
        embedding_url = %state.config.embedding.url,
        "Starting vault gateway with graceful shutdown (30s timeout)"
    );

    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
            // ConnectionManager closes on drop
            drop(state.redis);
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Vault gateway shutdown complete");
    Ok(())
}
