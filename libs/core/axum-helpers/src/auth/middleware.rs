use super::jwt::{TokenAuthority, TokenError};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

/// Extract the credential from `Authorization: Bearer <token>`.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject the request with 401 unless it carries a valid bearer token.
///
/// A missing header and a bad token produce the same response body.
///
/// On success the [`AuthIdentity`](super::AuthIdentity) is inserted into request
/// extensions for handlers to pick up with `Extension<AuthIdentity>`.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/collect", post(collect))
///     .layer(axum::middleware::from_fn_with_state(authority, require_bearer));
/// ```
pub async fn require_bearer(
    State(authority): State<TokenAuthority>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_bearer(request.headers()) else {
        tracing::debug!("No bearer token in Authorization header");
        return Err(TokenError::Invalid.into());
    };

    let identity = authority.verify(token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
