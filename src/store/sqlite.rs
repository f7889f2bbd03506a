//! SQLite-backed admin repository

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use super::{AdminAccount, AdminRepository, NewAdminAccount, StoreError};
use crate::response::Paginator;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS manager (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    salt TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    phone TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

const COLUMNS: &str = "id, account, password, salt, name, phone, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    /// Open the database, creating the file if it does not exist
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `manager` table if missing
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Private in-memory database with the schema applied
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        // A single never-recycled connection keeps the database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repository = Self::from_pool(pool);
        repository.migrate().await.unwrap();
        repository
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn find_by_account(&self, account: &str) -> Result<Option<AdminAccount>, StoreError> {
        let sql = format!("SELECT {} FROM manager WHERE account = ?", COLUMNS);
        let row = sqlx::query_as::<_, AdminAccount>(&sql)
            .bind(account)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminAccount>, StoreError> {
        let sql = format!("SELECT {} FROM manager WHERE id = ?", COLUMNS);
        let row = sqlx::query_as::<_, AdminAccount>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn paginate(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Paginator<AdminAccount>, StoreError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM manager")
            .fetch_one(&self.pool)
            .await?;

        let limit = i64::try_from(per_page).unwrap_or(i64::MAX);
        let offset = i64::try_from((page - 1).saturating_mul(per_page)).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT {} FROM manager ORDER BY id LIMIT ? OFFSET ?",
            COLUMNS
        );
        let items = sqlx::query_as::<_, AdminAccount>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginator::new(items, total.max(0) as u64, per_page, page))
    }

    async fn insert(&self, account: NewAdminAccount) -> Result<AdminAccount, StoreError> {
        let sql = format!(
            "INSERT INTO manager (account, password, salt, name, phone) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let result = sqlx::query_as::<_, AdminAccount>(&sql)
            .bind(&account.account)
            .bind(&account.password)
            .bind(&account.salt)
            .bind(&account.name)
            .bind(&account.phone)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate(account.account))
            }
            Err(e) => Err(e.into()),
        }
    }
}
