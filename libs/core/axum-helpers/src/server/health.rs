use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Outcome of [`run_health_checks`], keyed by check name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub checks: BTreeMap<String, bool>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.checks.values().all(|ok| *ok)
    }

    /// Map each check to `up` or `down` and merge into `base`.
    pub fn to_json(&self, base: Value, up: &str, down: &str) -> Value {
        let mut map = match base {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (name, ok) in &self.checks {
            map.insert(name.clone(), json!(if *ok { up } else { down }));
        }
        Value::Object(map)
    }

    /// Readiness probe rendering: 200 when every check passed, 503 otherwise.
    pub fn into_ready_response(self) -> Response {
        let ready = self.all_healthy();
        let body = self.to_json(
            json!({ "status": if ready { "ready" } else { "not ready" } }),
            "connected",
            "disconnected",
        );
        let status = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(body)).into_response()
    }
}

/// Run every check concurrently.
///
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![
///     ("database", Box::pin(async { check_db(&db).await.map_err(|e| e.to_string()) })),
///     ("redis", Box::pin(async { check_redis(&mut conn).await.map_err(|e| e.to_string()) })),
/// ];
/// let report = run_health_checks(checks).await;
/// ```
pub async fn run_health_checks(checks: Vec<(&str, HealthCheckFuture<'_>)>) -> HealthReport {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut report = BTreeMap::new();
    for (name, result) in names.into_iter().zip(results) {
        if let Err(e) = &result {
            tracing::error!(check = name, error = %e, "Health check failed");
        }
        report.insert(name.to_string(), result.is_ok());
    }

    HealthReport { checks: report }
}

async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// Liveness endpoint at `/health`; answers 200 whenever the process is serving.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_run_health_checks_reports_each_check() {
        let checks: Vec<(&str, HealthCheckFuture)> = vec![
            ("database", Box::pin(async { Ok(()) })),
            ("redis", Box::pin(async { Err("connection refused".to_string()) })),
        ];

        let report = run_health_checks(checks).await;
        assert!(!report.all_healthy());
        assert_eq!(report.checks.get("database"), Some(&true));
        assert_eq!(report.checks.get("redis"), Some(&false));

        let body = report.to_json(json!({"gateway": "healthy"}), "healthy", "unhealthy");
        assert_eq!(
            body,
            json!({"gateway": "healthy", "database": "healthy", "redis": "unhealthy"})
        );
    }

    #[tokio::test]
    async fn test_ready_response_status_follows_checks() {
        let healthy = HealthReport {
            checks: BTreeMap::from([("database".to_string(), true)]),
        };
        assert_eq!(healthy.into_ready_response().status(), StatusCode::OK);

        let degraded = HealthReport {
            checks: BTreeMap::from([("database".to_string(), false)]),
        };
        let response = degraded.into_ready_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
    }

    #[tokio::test]
    async fn test_health_router_reports_app_info() {
        let app = health_router(AppInfo {
            name: "vault-gateway",
            version: "0.1.0",
        });

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "vault-gateway");
    }
}
