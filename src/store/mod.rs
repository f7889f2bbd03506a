//! Admin account storage
//!
//! The service talks to storage through [`AdminRepository`]; the only
//! implementation is [`sqlite::SqliteAdminRepository`].

pub mod sqlite;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::response::Paginator;

pub use sqlite::SqliteAdminRepository;

/// Row of the `manager` table
///
/// `password` and `salt` never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AdminAccount {
    pub id: i64,
    pub account: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Values for a new account row; `password` is already hashed
#[derive(Debug, Clone)]
pub struct NewAdminAccount {
    pub account: String,
    pub password: String,
    pub salt: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Storage error types
#[derive(Debug)]
pub enum StoreError {
    /// Query or connection failure
    Database(sqlx::Error),

    /// Login name already taken
    Duplicate(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Duplicate(account) => write!(f, "Account already exists: {}", account),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::Duplicate(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Admin account repository
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Look up by login name
    async fn find_by_account(&self, account: &str) -> Result<Option<AdminAccount>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminAccount>, StoreError>;

    /// One page of accounts ordered by id
    async fn paginate(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Paginator<AdminAccount>, StoreError>;

    /// Insert a row and return it as stored
    async fn insert(&self, account: NewAdminAccount) -> Result<AdminAccount, StoreError>;
}
