use axum_helpers::JwtConfig;
use core_config::{AppInfo, Environment, FromEnv, app_info, server::ServerConfig};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_accounts::HasherConfig;
use domain_vault::{EmbeddingConfig, VaultConfig};

/// Everything the gateway reads from the environment, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub hasher: HasherConfig,
    pub embedding: EmbeddingConfig,
    pub vault: VaultConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?, // DATABASE_URL is required
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?, // JWT_SECRET is required
            hasher: HasherConfig::from_env()?,
            embedding: EmbeddingConfig::from_env()?,
            vault: VaultConfig::from_env()?,
        })
    }
}
