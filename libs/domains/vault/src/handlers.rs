use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuthIdentity, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::VaultResult;
use crate::models::{
    CollectRequest, CollectResponse, ProcessingStatus, SearchHit, SearchQuery, SearchResponse,
    StatusResponse,
};
use crate::repository::VaultRepository;
use crate::service::VaultService;

const TAG: &str = "Vault";

#[derive(OpenApi)]
#[openapi(
    paths(collect, search, status),
    components(
        schemas(
            CollectRequest,
            CollectResponse,
            ProcessingStatus,
            SearchHit,
            SearchResponse,
            StatusResponse
        ),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Record ingestion, status and semantic search")
    )
)]
pub struct ApiDoc;

/// Vault routes. Every handler expects an [`AuthIdentity`] extension, so mount this behind
/// `require_bearer`.
pub fn router<R: VaultRepository + 'static>(service: VaultService<R>) -> Router {
    Router::new()
        .route("/collect", post(collect))
        .route("/search", get(search))
        .route("/status/{id}", get(status))
        .with_state(Arc::new(service))
}

/// Store a record and queue it for processing
#[utoipa::path(
    post,
    path = "/collect",
    tag = TAG,
    request_body = CollectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 202, description = "Accepted; processing may be delayed", body = CollectResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn collect<R: VaultRepository>(
    State(service): State<Arc<VaultService<R>>>,
    Extension(identity): Extension<AuthIdentity>,
    ValidatedJson(input): ValidatedJson<CollectRequest>,
) -> VaultResult<impl IntoResponse> {
    let accepted = service
        .collect(&identity, &input.data_type, input.data)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// Semantic search over the caller's processed records
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Up to 10 records, closest first", body = SearchResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn search<R: VaultRepository>(
    State(service): State<Arc<VaultService<R>>>,
    Extension(identity): Extension<AuthIdentity>,
    Query(query): Query<SearchQuery>,
) -> VaultResult<Json<SearchResponse>> {
    let response = service.search(&identity, &query.q).await?;
    Ok(Json(response))
}

/// Processing status of one of the caller's records
///
/// Any id that does not name a visible record is 404, including ids that are not UUIDs.
#[utoipa::path(
    get,
    path = "/status/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Record ID as returned by collect")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn status<R: VaultRepository>(
    State(service): State<Arc<VaultService<R>>>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> VaultResult<Json<StatusResponse>> {
    let status = service.get_status(&identity, &id).await?;
    Ok(Json(status))
}
