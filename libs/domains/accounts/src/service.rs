use axum_helpers::{IssuedToken, TokenAuthority};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AccountError, AccountResult};
use crate::hasher::PasswordHasher;
use crate::models::{Account, NewAccount, normalize_email};
use crate::repository::AccountRepository;

/// Upper bound on one repository call unless overridden with `with_store_timeout`.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Signup and login.
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenAuthority,
    store_timeout: Duration,
}

impl<R: AccountRepository> Clone for AccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
            store_timeout: self.store_timeout,
        }
    }
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: R, hasher: PasswordHasher, tokens: TokenAuthority) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher,
            tokens,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = AccountResult<T>>,
    ) -> AccountResult<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AccountError::Dependency(format!(
                    "Store {} timed out after {:?}",
                    operation, self.store_timeout
                ))
            })?
    }

    /// Create an account, creating its tenant on first signup from the email domain.
    pub async fn signup(&self, email: &str, password: &str) -> AccountResult<Account> {
        let (email, domain) = normalize_email(email)
            .ok_or_else(|| AccountError::Validation("email must be a valid address".to_string()))?;
        validate_password(password)?;

        let tenant = self
            .bounded("tenant upsert", self.repository.upsert_tenant(&domain))
            .await?;

        let salt = PasswordHasher::generate_salt();
        let password_hash = self.hasher.hash(password, &salt).await?;

        let create = self.repository.create_account(NewAccount {
            tenant_id: tenant.id,
            email,
            password_hash,
            password_salt: salt,
        });
        let account = self.bounded("account insert", create).await?;

        tracing::info!(account_id = %account.id, tenant_id = %tenant.id, "Signup completed");
        Ok(account)
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Every rejection is the same `InvalidCredentials`; unknown emails still pay for one
    /// hash so timing does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> AccountResult<IssuedToken> {
        let Some((email, _)) = normalize_email(email) else {
            self.hasher.dummy_verify(password).await;
            return Err(AccountError::InvalidCredentials);
        };

        let lookup = self.repository.find_by_email(&email);
        let Some(account) = self.bounded("account lookup", lookup).await? else {
            self.hasher.dummy_verify(password).await;
            tracing::debug!("Login for unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let matches = match self
            .hasher
            .verify(password, &account.password_salt, &account.password_hash)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(account_id = %account.id, error = %e, "Stored credentials unusable");
                false
            }
        };

        if !matches || !account.is_active() {
            tracing::debug!(account_id = %account.id, "Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self
            .tokens
            .issue(account.id, account.tenant_id, &account.email)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(issued)
    }

    pub fn token_authority(&self) -> &TokenAuthority {
        &self.tokens
    }
}

fn validate_password(password: &str) -> AccountResult<()> {
    let len = password.chars().count();
    if !(8..=128).contains(&len) {
        return Err(AccountError::Validation(
            "password must be between 8 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::HasherConfig;
    use crate::models::{AccountStatus, Tenant};
    use crate::repository::{InMemoryAccountRepository, MockAccountRepository};
    use axum_helpers::JwtConfig;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HasherConfig {
            time_cost: 1,
            memory_kib: 1024,
            parallelism: 1,
        })
        .unwrap()
    }

    fn tokens() -> TokenAuthority {
        TokenAuthority::new(&JwtConfig::new("service-test-secret-at-least-32-chars").unwrap())
    }

    fn service() -> (AccountService<InMemoryAccountRepository>, InMemoryAccountRepository) {
        let repo = InMemoryAccountRepository::new();
        (AccountService::new(repo.clone(), hasher(), tokens()), repo)
    }

    #[tokio::test]
    async fn test_signup_then_login_issues_verifiable_token() {
        let (service, _) = service();
        let account = service.signup("a@x.com", "password1").await.unwrap();

        let issued = service.login("a@x.com", "password1").await.unwrap();
        assert_eq!(issued.expires_in, 2_592_000);

        let identity = service.token_authority().verify(&issued.token).unwrap();
        assert_eq!(identity.account_id, account.id);
        assert_eq!(identity.tenant_id, account.tenant_id);
        assert_eq!(identity.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_signup_normalizes_email() {
        let (service, _) = service();
        let account = service.signup("Alice@X.com", "password1").await.unwrap();
        assert_eq!(account.email, "alice@x.com");

        assert!(service.login("ALICE@x.com", "password1").await.is_ok());
    }

    #[tokio::test]
    async fn test_signups_in_same_domain_share_tenant() {
        let (service, repo) = service();
        let a = service.signup("a@x.com", "password1").await.unwrap();
        let b = service.signup("b@x.com", "password1").await.unwrap();
        let c = service.signup("c@y.com", "password1").await.unwrap();

        assert_eq!(a.tenant_id, b.tenant_id);
        assert_ne!(a.tenant_id, c.tenant_id);
        assert_eq!(repo.tenant_count().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_signups_produce_one_tenant() {
        let (service, repo) = service();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .signup(&format!("user{}@x.com", i), "password1")
                        .await
                })
            })
            .collect();

        let mut tenants = Vec::new();
        for handle in handles {
            tenants.push(handle.await.unwrap().unwrap().tenant_id);
        }

        tenants.dedup();
        assert_eq!(tenants.len(), 1);
        assert_eq!(repo.tenant_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_conflict() {
        let (service, _) = service();
        service.signup("a@x.com", "password1").await.unwrap();

        let err = service.signup("A@x.com", "password2").await.unwrap_err();
        assert!(matches!(err, AccountError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_signup_rejects_malformed_email() {
        let (service, repo) = service();

        for email in ["a@b@x.com", "not an email@x", "no-at-sign", "a@"] {
            let err = service.signup(email, "password1").await.unwrap_err();
            assert!(matches!(err, AccountError::Validation(_)), "{email} was accepted");
        }
        assert_eq!(repo.tenant_count().await, 0);
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let (service, _) = service();
        let err = service.signup("a@x.com", "short").await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, repo) = service();
        service.signup("a@x.com", "password1").await.unwrap();
        service.signup("d@x.com", "password1").await.unwrap();
        repo.set_status("d@x.com", AccountStatus::Disabled).await;

        let wrong_password = service.login("a@x.com", "password2").await.unwrap_err();
        let unknown_email = service.login("nobody@x.com", "password1").await.unwrap_err();
        let disabled = service.login("d@x.com", "password1").await.unwrap_err();

        for err in [wrong_password, unknown_email, disabled] {
            assert!(matches!(err, AccountError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_corrupted_stored_hash_is_invalid_credentials() {
        let (service, repo) = service();
        let tenant = repo.upsert_tenant("x.com").await.unwrap();
        repo.create_account(NewAccount {
            tenant_id: tenant.id,
            email: "broken@x.com".to_string(),
            password_hash: "not-a-phc-string".to_string(),
            password_salt: "!!".to_string(),
        })
        .await
        .unwrap();

        let err = service.login("broken@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    /// Never answers, like a store stuck on a lock or a lost connection.
    struct HungRepository;

    #[async_trait::async_trait]
    impl AccountRepository for HungRepository {
        async fn upsert_tenant(&self, _domain: &str) -> AccountResult<Tenant> {
            std::future::pending().await
        }

        async fn create_account(&self, _input: NewAccount) -> AccountResult<Account> {
            std::future::pending().await
        }

        async fn find_by_email(&self, _email: &str) -> AccountResult<Option<Account>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_hung_store_is_dependency() {
        let service = AccountService::new(HungRepository, hasher(), tokens())
            .with_store_timeout(Duration::from_millis(50));

        let err = service.signup("a@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::Dependency(ref msg) if msg.contains("tenant upsert")));

        let err = service.login("a@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_store_outage_is_dependency() {
        let mut repo = MockAccountRepository::new();
        repo.expect_upsert_tenant()
            .returning(|_| Err(AccountError::Dependency("connection refused".into())));

        let service = AccountService::new(repo, hasher(), tokens());
        let err = service.signup("a@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_login_store_outage_is_dependency() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AccountError::Dependency("connection refused".into())));

        let service = AccountService::new(repo, hasher(), tokens());
        let err = service.login("a@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::Dependency(_)));
    }
}
