//! Reachability checks for the backing stores, shared by `/ready` and `/admin/health`.

use async_trait::async_trait;
use axum_helpers::{HealthCheckFuture, HealthReport, run_health_checks};
use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use std::sync::Arc;

#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> Result<(), String>;
}

pub struct PostgresProbe(pub DatabaseConnection);

#[async_trait]
impl Probe for PostgresProbe {
    async fn check(&self) -> Result<(), String> {
        database::postgres::check_health(&self.0)
            .await
            .map_err(|e| e.to_string())
    }
}

pub struct RedisProbe(pub ConnectionManager);

#[async_trait]
impl Probe for RedisProbe {
    async fn check(&self) -> Result<(), String> {
        let mut conn = self.0.clone();
        database::redis::check_health(&mut conn)
            .await
            .map_err(|e| e.to_string())
    }
}

#[derive(Clone)]
pub struct Probes {
    pub database: Arc<dyn Probe>,
    pub redis: Arc<dyn Probe>,
}

impl Probes {
    pub async fn report(&self) -> HealthReport {
        let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
            ("database", self.database.check()),
            ("redis", self.redis.check()),
        ];
        run_health_checks(checks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    #[async_trait]
    impl Probe for Fixed {
        async fn check(&self) -> Result<(), String> {
            if self.0 { Ok(()) } else { Err("unreachable".to_string()) }
        }
    }

    #[tokio::test]
    async fn test_report_names_each_store() {
        let probes = Probes {
            database: Arc::new(Fixed(true)),
            redis: Arc::new(Fixed(false)),
        };

        let report = probes.report().await;
        assert_eq!(report.checks.get("database"), Some(&true));
        assert_eq!(report.checks.get("redis"), Some(&false));
        assert!(!report.all_healthy());
    }
}
