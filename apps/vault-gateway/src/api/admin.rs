use axum::{Json, Router, extract::State, response::Response, routing::get};
use axum_helpers::errors::responses::UnauthorizedResponse;
use serde_json::{Value, json};

use crate::health::Probes;

pub const TAG: &str = "Admin";

pub fn router(probes: Probes) -> Router {
    Router::new()
        .route("/health", get(admin_health))
        .with_state(probes)
}

/// Gateway and backing store status
///
/// Always 200; each store reports `healthy` or `unhealthy`.
#[utoipa::path(
    get,
    path = "/v1/admin/health",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Component status",
            example = json!({"gateway": "healthy", "database": "healthy", "redis": "healthy"})),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn admin_health(State(probes): State<Probes>) -> Json<Value> {
    let report = probes.report().await;
    Json(report.to_json(json!({ "gateway": "healthy" }), "healthy", "unhealthy"))
}

/// 200 when Postgres and Redis both answer, 503 otherwise.
pub async fn ready_handler(State(probes): State<Probes>) -> Response {
    probes.report().await.into_ready_response()
}
