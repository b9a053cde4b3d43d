use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, AccountStatus, NewAccount, Tenant};

/// Persistence for tenants and member accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Return the tenant for `domain`, creating it if needed.
    ///
    /// Concurrent calls for the same domain must resolve to one tenant.
    async fn upsert_tenant(&self, domain: &str) -> AccountResult<Tenant>;

    /// Insert an account; `Conflict` when the email is taken.
    async fn create_account(&self, input: NewAccount) -> AccountResult<Account>;

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>>;
}

#[derive(Debug, Default)]
struct Store {
    tenants: HashMap<String, Tenant>,
    accounts: HashMap<String, Account>,
}

/// In-memory implementation of AccountRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tenant_count(&self) -> usize {
        self.store.read().await.tenants.len()
    }

    /// Flip an account's status; used to exercise the disabled-account login path.
    pub async fn set_status(&self, email: &str, status: AccountStatus) -> bool {
        let mut store = self.store.write().await;
        match store.accounts.get_mut(email) {
            Some(account) => {
                account.status = status;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn upsert_tenant(&self, domain: &str) -> AccountResult<Tenant> {
        let mut store = self.store.write().await;

        let tenant = store
            .tenants
            .entry(domain.to_string())
            .or_insert_with(|| {
                tracing::info!(domain, "Created tenant");
                Tenant {
                    id: Uuid::now_v7(),
                    name: domain.to_string(),
                    domain: domain.to_string(),
                    created_at: Utc::now(),
                }
            })
            .clone();

        Ok(tenant)
    }

    async fn create_account(&self, input: NewAccount) -> AccountResult<Account> {
        let mut store = self.store.write().await;

        if !store.tenants.values().any(|t| t.id == input.tenant_id) {
            return Err(AccountError::Internal(format!(
                "Tenant {} does not exist",
                input.tenant_id
            )));
        }

        if store.accounts.contains_key(&input.email) {
            return Err(AccountError::Conflict(input.email));
        }

        let account = Account {
            id: Uuid::now_v7(),
            tenant_id: input.tenant_id,
            email: input.email,
            password_hash: input.password_hash,
            password_salt: input.password_salt,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        store.accounts.insert(account.email.clone(), account.clone());

        tracing::info!(account_id = %account.id, "Created account");
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        Ok(self.store.read().await.accounts.get(email).cloned())
    }
}
