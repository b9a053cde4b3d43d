use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Record '{0}' not found")]
    NotFound(String),

    /// Store, queue or embedding service failed or timed out.
    #[error("Dependency unavailable: {0}")]
    Dependency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VaultResult<T> = Result<T, VaultError>;

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VaultError::Dependency(format!("Embedding request timed out: {}", err))
        } else {
            VaultError::Dependency(format!("Embedding request failed: {}", err))
        }
    }
}

impl From<VaultError> for AppError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Validation(msg) => AppError::BadRequest(msg),
            VaultError::NotFound(_) => AppError::NotFound("Record not found".to_string()),
            VaultError::Dependency(detail) => {
                tracing::error!(error = %detail, "Vault dependency unavailable");
                AppError::ServiceUnavailable(
                    "Vault service is temporarily unavailable".to_string(),
                )
            }
            VaultError::Internal(detail) => {
                tracing::error!(error = %detail, "Vault operation failed");
                AppError::InternalServerError("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
