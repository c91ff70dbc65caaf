//! Storage layer for deskkit
//!
//! This module provides SQLite-backed persistence:
//! - Connection pool and raw query helpers
//! - Versioned migrations with a ledger table
//! - `settings` and `app_state` key/value stores

mod database;
mod migrations;
mod settings;
mod value;

pub use database::{Database, DatabaseOptions, default_data_dir, execute_with, select_with};
pub use migrations::{BASE_VERSION, Migration, MigrationStatus, base_migrations};
pub use settings::{AppState, SettingEntry, Settings};
pub use value::{QueryResult, Row, decode_lenient};
