//! Accounts domain: tenants, member accounts, password hashing and the signup/login flow.
//!
//! ```ignore
//! use domain_accounts::{AccountService, PasswordHasher, PgAccountRepository, handlers};
//!
//! let service = AccountService::new(
//!     PgAccountRepository::new(db),
//!     PasswordHasher::new(&hasher_config)?,
//!     token_authority,
//! );
//! let routes = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod hasher;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AccountError, AccountResult};
pub use handlers::ApiDoc;
pub use hasher::{HasherConfig, PasswordHasher};
pub use models::{
    Account, AccountStatus, LoginRequest, LoginResponse, NewAccount, SignupRequest,
    SignupResponse, Tenant,
};
pub use postgres::PgAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AccountService;
