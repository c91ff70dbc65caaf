//! SQLite database operations
//!
//! Provides connection pool management, migrations and raw query helpers.

use futures_util::future::BoxFuture;
use serde_json::Value;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::migrations::{self, Migration, MigrationStatus, base_migrations};
use super::settings::{AppState, Settings};
use super::value::{QueryResult, Row, bind_params, row_to_json};
use crate::config::DatabaseConfig;
use crate::error::Result;

/// Default maximum connections in the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const MEMORY: &str = ":memory:";

/// Connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// Path to the SQLite database file, or `:memory:`
    pub path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Whether to run migrations on open
    pub auto_migrate: bool,
    /// Applied after the built-in migrations
    pub migrations: Vec<Migration>,
    pub journal_mode: SqliteJournalMode,
    pub synchronous: SqliteSynchronous,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("app.db"),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
            migrations: Vec::new(),
            journal_mode: SqliteJournalMode::Wal,
            synchronous: SqliteSynchronous::Normal,
        }
    }
}

impl DatabaseOptions {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// In-memory database, mostly for tests
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY),
            // the database lives only as long as an open connection, so the
            // pool keeps exactly one and never recycles it
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Resolve the config's `name` against `data_dir`
    ///
    /// Absolute paths and `:memory:` are used as is.
    pub fn from_config(config: &DatabaseConfig, data_dir: &Path) -> Self {
        let mut options = if config.name == MEMORY {
            Self::in_memory()
        } else if Path::new(&config.name).is_absolute() {
            Self::with_path(&config.name)
        } else {
            Self::with_path(data_dir.join(&config.name))
        };
        options.migrations = config.migrations.clone();
        options
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn migrations(mut self, migrations: Vec<Migration>) -> Self {
        self.migrations = migrations;
        self
    }

    /// Disable automatic migrations
    pub fn no_migrate(mut self) -> Self {
        self.auto_migrate = false;
        self
    }

    fn is_memory(&self) -> bool {
        self.path.to_string_lossy() == MEMORY
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let pool = SqlitePoolOptions::new().max_connections(self.max_connections);
        if self.is_memory() {
            pool.min_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            pool
        }
    }
}

/// Default directory for the database file
pub fn default_data_dir() -> PathBuf {
    if let Ok(custom_dir) = std::env::var("DESKKIT_DATA_DIR") {
        return PathBuf::from(custom_dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("deskkit"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    options: DatabaseOptions,
}

impl Database {
    /// Open a connection pool with the given options
    pub async fn new(options: DatabaseOptions) -> Result<Self> {
        // Ensure the directory exists
        if !options.is_memory() {
            if let Some(parent) = options.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let connection_str = if options.is_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", options.path.display())
        };

        let connect_options = SqliteConnectOptions::from_str(&connection_str)?
            .journal_mode(options.journal_mode)
            .synchronous(options.synchronous)
            .create_if_missing(true);

        let pool = options.pool_options().connect_with(connect_options).await?;

        // Enable foreign keys
        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

        tracing::info!(path = %options.path.display(), "database opened");

        let db = Self { pool, options };
        if db.options.auto_migrate {
            db.migrate().await?;
        }
        Ok(db)
    }

    /// Open the database described by the app config
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::new(DatabaseOptions::from_config(config, &default_data_dir())).await
    }

    /// Create an in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self> {
        Self::new(DatabaseOptions::in_memory()).await
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.options.path
    }

    /// Built-in migrations followed by the configured ones
    pub fn all_migrations(&self) -> Vec<Migration> {
        let mut all = base_migrations();
        all.extend(self.options.migrations.iter().cloned());
        all
    }

    /// Run pending migrations. Returns the versions applied.
    pub async fn migrate(&self) -> Result<Vec<i64>> {
        migrations::run_migrations(&self.pool, &self.all_migrations()).await
    }

    pub async fn migration_status(&self) -> Result<MigrationStatus> {
        migrations::migration_status(&self.pool, &self.all_migrations()).await
    }

    /// Undo migrations newer than `version`, newest first
    pub async fn revert_to(&self, version: i64) -> Result<Vec<i64>> {
        migrations::revert_to(&self.pool, &self.all_migrations(), version).await
    }

    /// Run a statement with positional `?` parameters
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        execute_with(&self.pool, sql, params).await
    }

    /// Run a query and return every row as a JSON object
    pub async fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        select_with(&self.pool, sql, params).await
    }

    /// Run `f` inside a transaction
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>>,
    {
        let mut tx = self.pool.begin().await?;
        match f(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "rolling back transaction");
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    pub fn app_state(&self) -> AppState<'_> {
        AppState::new(self)
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("database closed");
    }
}

/// [`Database::execute`] against any executor, e.g. a transaction
pub async fn execute_with<'c, E>(executor: E, sql: &str, params: &[Value]) -> Result<QueryResult>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = bind_params(sqlx::query(sql), params)
        .execute(executor)
        .await?;
    Ok(QueryResult {
        rows_affected: result.rows_affected(),
        last_insert_id: result.last_insert_rowid(),
    })
}

/// [`Database::select`] against any executor
pub async fn select_with<'c, E>(executor: E, sql: &str, params: &[Value]) -> Result<Vec<Row>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows = bind_params(sqlx::query(sql), params)
        .fetch_all(executor)
        .await?;
    rows.iter().map(row_to_json).collect()
}
