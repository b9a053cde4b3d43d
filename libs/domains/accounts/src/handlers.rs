use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        ServiceUnavailableResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AccountResult;
use crate::models::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use crate::repository::AccountRepository;
use crate::service::AccountService;

const TAG: &str = "Auth";

#[derive(OpenApi)]
#[openapi(
    paths(signup, login),
    components(
        schemas(SignupRequest, SignupResponse, LoginRequest, LoginResponse),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Member signup and login")
    )
)]
pub struct ApiDoc;

/// Public routes: `/signup` and `/login`.
pub fn router<R: AccountRepository + 'static>(service: AccountService<R>) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .with_state(Arc::new(service))
}

/// Register a member account
#[utoipa::path(
    post,
    path = "/signup",
    tag = TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AccountResult<impl IntoResponse> {
    let account = service.signup(&input.email, &input.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account created successfully".to_string(),
            member_id: account.id,
        }),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn login<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AccountResult<Json<LoginResponse>> {
    let issued = service.login(&input.email, &input.password).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}
