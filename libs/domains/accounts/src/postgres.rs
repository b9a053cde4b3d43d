use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement};
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, NewAccount, Tenant};
use crate::repository::AccountRepository;

/// PostgreSQL implementation of AccountRepository using raw parameterized statements
#[derive(Clone)]
pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct TenantRow {
    id: Uuid,
    name: String,
    domain: String,
    created_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            domain: row.domain,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct AccountRow {
    id: Uuid,
    tenant_id: Uuid,
    email: String,
    password_hash: String,
    password_salt: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            tenant_id: row.tenant_id,
            email: row.email,
            password_hash: row.password_hash,
            password_salt: row.password_salt,
            status: row.status.parse().map_err(AccountError::Internal)?,
            created_at: row.created_at,
        })
    }
}

/// Store failures surface as `Dependency`; the detail is logged by the error conversion.
fn store_error(e: DbErr) -> AccountError {
    AccountError::Dependency(format!("Database error: {}", e))
}

const ACCOUNT_COLUMNS: &str =
    "id, tenant_id, email, password_hash, password_salt, status, created_at";

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn upsert_tenant(&self, domain: &str) -> AccountResult<Tenant> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let sql = r#"
            INSERT INTO tenants (name, domain) VALUES ($1, $1)
            ON CONFLICT (domain) DO UPDATE SET domain = EXCLUDED.domain
            RETURNING id, name, domain, created_at
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [domain.into()]);

        let row = TenantRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AccountError::Internal("Tenant upsert returned no row".to_string()))?;

        Ok(row.into())
    }

    async fn create_account(&self, input: NewAccount) -> AccountResult<Account> {
        let sql = format!(
            r#"
            INSERT INTO accounts (tenant_id, email, password_hash, password_salt)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                input.tenant_id.into(),
                input.email.clone().into(),
                input.password_hash.into(),
                input.password_salt.into(),
            ],
        );

        let row = AccountRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AccountError::Conflict(input.email.clone())
                }
                _ => store_error(e),
            })?
            .ok_or_else(|| AccountError::Internal("Account insert returned no row".to_string()))?;

        let account = Account::try_from(row)?;
        tracing::info!(account_id = %account.id, tenant_id = %account.tenant_id, "Created account");
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);

        AccountRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(Account::try_from)
            .transpose()
    }
}
