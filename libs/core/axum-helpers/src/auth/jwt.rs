use super::config::JwtConfig;
use crate::errors::{AppError, ErrorCode};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,   // account id
    tid: Uuid,   // tenant id
    email: String,
    iat: i64,
    exp: i64,
}

/// Identity carried by a verified token, inserted into request extensions by
/// [`require_bearer`](super::middleware::require_bearer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub account_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Parse failure, bad signature and expiry are deliberately indistinguishable.
    #[error("invalid or expired token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => {
                AppError::Unauthorized(ErrorCode::Unauthorized.default_message().to_string())
            }
            TokenError::Signing(e) => AppError::InternalServerError(e),
        }
    }
}

/// Issues and verifies HS256 tokens with one shared secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenAuthority {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`, without leeway.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        tracing::info!(ttl_secs = config.ttl_secs, "Token authority initialized");

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl_secs: config.ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(
        &self,
        account_id: Uuid,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_id, tenant_id, email, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at(
        &self,
        account_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        now: i64,
    ) -> Result<IssuedToken, TokenError> {
        let claims = JwtClaims {
            sub: account_id,
            tid: tenant_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }

    pub fn verify(&self, token: &str) -> Result<AuthIdentity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Valid iff the signature matches and `now < exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<AuthIdentity, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;

        let claims = data.claims;
        if now >= claims.exp {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(TokenError::Invalid);
        }

        Ok(AuthIdentity {
            account_id: claims.sub,
            tenant_id: claims.tid,
            email: claims.email,
            expires_at: claims.exp,
        })
    }
}
