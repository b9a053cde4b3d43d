use core_config::{ConfigError, FromEnv, env_or_default};

#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FromEnv for RedisConfig {
    /// - REDIS_URL: defaults to redis://127.0.0.1:6379
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("REDIS_URL", "redis://127.0.0.1:6379");

        if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
            return Err(ConfigError::ParseError {
                key: "REDIS_URL".to_string(),
                details: "expected a redis:// or rediss:// URL".to_string(),
            });
        }

        Ok(Self { url })
    }
}
