use crate::models::User;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the user store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Username already exists: {0}")]
    Duplicate(String),
}

/// SQLite-backed store for the `users` table
///
/// The table is created by the embedded migrations when the store is
/// opened, so a fresh database file is usable immediately.
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open (creating if needed) the database at `database_url`
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Opening user database at {}", url);

        Self::new(url, max_connections.unwrap_or(5), min_connections.unwrap_or(1)).await
    }

    /// Private in-memory database, mostly for tests
    ///
    /// Each SQLite memory connection is its own database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert a user; the username must not be taken
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let query = r#"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
        "#;

        let result = sqlx::query(query)
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                    StoreError::Duplicate(username.to_string())
                } else {
                    StoreError::SqlxError(e)
                }
            })?;

        let user = User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };

        tracing::debug!("Created user {} with id {}", user.username, user.id);

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let query = r#"
            SELECT id, username, password_hash
            FROM users
            WHERE id = ?1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?1
        "#;

        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    pub async fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("username")).collect())
    }

    pub async fn list_ids(&self) -> Result<Vec<i64>, StoreError> {
        let rows = sqlx::query("SELECT id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }
}
