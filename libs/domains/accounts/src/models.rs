use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

/// Company that member accounts belong to, keyed by email domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "disabled" => Ok(AccountStatus::Disabled),
            other => Err(format!("unknown account status '{}'", other)),
        }
    }
}

/// Member account. `email` is stored lower-cased.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    /// PHC string of the Argon2id digest
    pub password_hash: String,
    /// Base64 salt the digest was computed with
    pub password_salt: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub tenant_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "a@x.com")]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    #[schema(example = "password1", min_length = 8, max_length = 128)]
    pub password: String,
}

/// Login only checks presence; everything else is answered with the same 401.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 320))]
    pub email: String,

    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub member_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    #[schema(example = 2592000)]
    pub expires_in: i64,
}

/// Lower-case a syntactically valid address and split off its domain.
pub(crate) fn normalize_email(email: &str) -> Option<(String, String)> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return None;
    }
    let (local, domain) = email.rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    let domain = domain.to_string();
    Some((email, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_extracts_domain() {
        assert_eq!(
            normalize_email("  Alice@Example.COM "),
            Some(("alice@example.com".to_string(), "example.com".to_string()))
        );
        assert_eq!(normalize_email("no-at-sign"), None);
        assert_eq!(normalize_email("@example.com"), None);
        assert_eq!(normalize_email("a@b@x.com"), None);
        assert_eq!(normalize_email("not an email@x"), None);
    }

    #[test]
    fn test_signup_request_validation() {
        let ok = SignupRequest {
            email: "a@x.com".into(),
            password: "password1".into(),
        };
        assert!(ok.validate().is_ok());

        let short = SignupRequest {
            email: "a@x.com".into(),
            password: "short".into(),
        };
        assert!(short.validate().is_err());

        let bad_email = SignupRequest {
            email: "not-an-email".into(),
            password: "password1".into(),
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_account_status_round_trip() {
        assert_eq!("disabled".parse::<AccountStatus>(), Ok(AccountStatus::Disabled));
        assert_eq!(AccountStatus::Active.to_string(), "active");
        assert!("locked".parse::<AccountStatus>().is_err());
    }
}
