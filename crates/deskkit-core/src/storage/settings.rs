//! Key/value stores on top of the `settings` and `app_state` tables

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use super::database::Database;
use super::value::decode_lenient;
use crate::error::Result;

const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES (?, ?, strftime('%s', 'now'))
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = strftime('%s', 'now')
"#;

const UPSERT_APP_STATE: &str = r#"
    INSERT INTO app_state (key, value, updated_at)
    VALUES (?, ?, strftime('%s', 'now'))
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = strftime('%s', 'now')
"#;

/// A settings row with its decoded value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: Value,
    pub updated_at: Option<DateTime<Utc>>,
}

/// User preferences
///
/// Strings are stored as is, everything else as JSON text. Reads decode
/// JSON when possible and fall back to the raw string.
#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    db: &'a Database,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|(raw,)| decode_lenient(&raw)))
    }

    /// Typed read. A value that does not fit `T` is an error.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = match serde_json::to_value(value)? {
            Value::String(s) => s,
            other => other.to_string(),
        };
        sqlx::query(UPSERT_SETTING)
            .bind(key)
            .bind(serialized)
            .execute(self.db.pool())
            .await?;
        tracing::debug!(key, "setting saved");
        Ok(())
    }

    /// Returns true when a row was removed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn all(&self) -> Result<BTreeMap<String, Value>> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect())
    }

    pub async fn entries(&self) -> Result<Vec<SettingEntry>> {
        let rows: Vec<(String, String, Option<i64>)> =
            sqlx::query_as("SELECT key, value, updated_at FROM settings ORDER BY key")
                .fetch_all(self.db.pool())
                .await?;
        Ok(rows
            .into_iter()
            .map(|(key, raw, updated_at)| SettingEntry {
                key,
                value: decode_lenient(&raw),
                updated_at: updated_at.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            })
            .collect())
    }
}

/// Persisted UI state
///
/// Values are always stored as JSON. `null` is stored as SQL `NULL` and
/// reads back as `None`.
#[derive(Debug, Clone, Copy)]
pub struct AppState<'a> {
    db: &'a Database,
}

impl<'a> AppState<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT value FROM app_state WHERE key = ?")
                .bind(key)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(row
            .and_then(|(raw,)| raw)
            .map(|raw| decode_lenient(&raw)))
    }

    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = match serde_json::to_value(value)? {
            Value::Null => None,
            other => Some(other.to_string()),
        };
        sqlx::query(UPSERT_APP_STATE)
            .bind(key)
            .bind(serialized)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM app_state WHERE key = ?")
            .bind(key)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
