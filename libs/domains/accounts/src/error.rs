use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unknown email, wrong password and disabled account all map here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account with email '{0}' already exists")]
    Conflict(String),

    #[error("Dependency unavailable: {0}")]
    Dependency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => AppError::BadRequest(msg),
            AccountError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            AccountError::Conflict(_) => {
                AppError::Conflict("An account with this email already exists".to_string())
            }
            AccountError::Dependency(detail) => {
                tracing::error!(error = %detail, "Account store unavailable");
                AppError::ServiceUnavailable(
                    "Account service is temporarily unavailable".to_string(),
                )
            }
            AccountError::Internal(detail) => {
                tracing::error!(error = %detail, "Account operation failed");
                AppError::InternalServerError("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
