//! Database migrations
//!
//! Migrations are versioned SQL scripts. The built-in ones create the
//! `settings` and `app_state` tables; callers append their own. Every applied
//! version is recorded in the `_migrations` ledger and skipped afterwards.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Highest version used by the built-in migrations
pub const BASE_VERSION: i64 = 3;

/// SQL for creating the migrations tracking table
const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        applied_at INTEGER DEFAULT (strftime('%s', 'now'))
    );
"#;

/// Migration 1: key/value settings
const MIGRATION_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER DEFAULT (strftime('%s', 'now'))
    )
"#;

/// Migration 2: persisted UI state
const MIGRATION_V2: &str = r#"
    CREATE TABLE IF NOT EXISTS app_state (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT UNIQUE NOT NULL,
        value TEXT,
        created_at INTEGER DEFAULT (strftime('%s', 'now')),
        updated_at INTEGER DEFAULT (strftime('%s', 'now'))
    )
"#;

/// Migration 3: app_state lookup index
const MIGRATION_V3: &str = "CREATE INDEX IF NOT EXISTS idx_app_state_key ON app_state(key)";

/// A versioned schema change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            up: up.into(),
            down: None,
        }
    }

    pub fn with_down(mut self, down: impl Into<String>) -> Self {
        self.down = Some(down.into());
        self
    }
}

/// The built-in migrations, in order
pub fn base_migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_settings_table", MIGRATION_V1)
            .with_down("DROP TABLE IF EXISTS settings"),
        Migration::new(2, "create_app_state_table", MIGRATION_V2)
            .with_down("DROP TABLE IF EXISTS app_state"),
        Migration::new(3, "create_app_state_index", MIGRATION_V3)
            .with_down("DROP INDEX IF EXISTS idx_app_state_key"),
    ]
}

/// Versions already recorded in the ledger
async fn applied_versions(pool: &SqlitePool) -> Result<BTreeSet<i64>> {
    // Ensure migrations table exists
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    let rows: Vec<(i64,)> = sqlx::query_as("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(v,)| v).collect())
}

/// Run a migration and record it, in one transaction
async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let failed = |source| Error::MigrationFailed {
        version: migration.version,
        name: migration.name.clone(),
        source,
    };

    let mut tx = pool.begin().await?;
    sqlx::raw_sql(&migration.up)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(&migration.name)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;
    tx.commit().await?;
    Ok(())
}

/// Run every migration whose version is not in the ledger
///
/// Migrations run in the order given. Returns the versions applied.
pub async fn run_migrations(pool: &SqlitePool, migrations: &[Migration]) -> Result<Vec<i64>> {
    let mut applied = applied_versions(pool).await?;

    tracing::info!(
        applied = applied.len(),
        known = migrations.len(),
        "Checking database migrations"
    );

    let mut newly_applied = Vec::new();
    let mut previous: Option<i64> = None;
    for migration in migrations {
        if previous.is_some_and(|p| migration.version <= p) {
            tracing::warn!(
                version = migration.version,
                name = %migration.name,
                "migration versions are not ascending"
            );
        }
        previous = Some(migration.version);

        if applied.contains(&migration.version) {
            continue;
        }

        tracing::info!(version = migration.version, name = %migration.name, "Applying migration");
        apply(pool, migration).await?;
        applied.insert(migration.version);
        newly_applied.push(migration.version);
    }

    if newly_applied.is_empty() {
        tracing::debug!("Database is up to date");
    } else {
        tracing::info!(count = newly_applied.len(), "Database migrations completed");
    }
    Ok(newly_applied)
}

/// Get migration status information
pub async fn migration_status(pool: &SqlitePool, migrations: &[Migration]) -> Result<MigrationStatus> {
    let applied = applied_versions(pool).await?;
    let pending: Vec<i64> = migrations
        .iter()
        .map(|m| m.version)
        .filter(|v| !applied.contains(v))
        .collect();
    Ok(MigrationStatus {
        current_version: applied.iter().next_back().copied().unwrap_or(0),
        target_version: migrations.iter().map(|m| m.version).max().unwrap_or(0),
        needs_migration: !pending.is_empty(),
        pending,
    })
}

/// Undo applied migrations newer than `target`, newest first
///
/// Fails before touching anything if one of them has no `down` statement.
pub async fn revert_to(pool: &SqlitePool, migrations: &[Migration], target: i64) -> Result<Vec<i64>> {
    let applied = applied_versions(pool).await?;
    let mut to_revert: Vec<&Migration> = migrations
        .iter()
        .filter(|m| m.version > target && applied.contains(&m.version))
        .collect();
    to_revert.sort_by(|a, b| b.version.cmp(&a.version));

    if let Some(m) = to_revert.iter().find(|m| m.down.is_none()) {
        return Err(Error::Other(format!(
            "migration v{} ({}) has no down statement",
            m.version, m.name
        )));
    }

    let mut reverted = Vec::new();
    for migration in to_revert {
        let down = migration.down.as_deref().unwrap_or_default();
        tracing::info!(version = migration.version, name = %migration.name, "Reverting migration");

        let failed = |source| Error::MigrationFailed {
            version: migration.version,
            name: migration.name.clone(),
            source,
        };
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(down).execute(&mut *tx).await.map_err(failed)?;
        sqlx::query("DELETE FROM _migrations WHERE version = ?")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await?;
        reverted.push(migration.version);
    }
    Ok(reverted)
}

/// Migration status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Highest version recorded in the ledger
    pub current_version: i64,
    /// Highest known version
    pub target_version: i64,
    /// Known versions not yet applied
    pub pending: Vec<i64>,
    pub needs_migration: bool,
}
