//! Deskkit Core Library
//!
//! This crate provides the building blocks of a deskkit desktop app:
//! - Configuration model and merge engine (defaults + caller overrides)
//! - Shell UI composition (title bar, sidebar, settings page) with slots and
//!   component overrides
//! - Theming (CSS custom properties, light/dark/system mode)
//! - Storage (SQLite settings, app state, migrations)
//! - Update client status machine
//! - Translations with built-in `en` and `zh` tables
//! - Error reporting
//! - Development notice for newer core releases

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod platform;
pub mod provider;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod updater;
pub mod version_check;

pub use error::{Error, Result};
pub use provider::{AppContext, InitFailure, InitStage, Provider};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, NavItem, PartialConfig, merge};
    pub use crate::error::{Error, Result};
    pub use crate::provider::{AppContext, Provider};
    pub use crate::theme::ThemeMode;
    pub use crate::ui::{
        Action, Element, MemoryRouter, Node, Override, RenderContext, Router, ShellProps,
    };
    pub use crate::updater::{UpdateService, UpdateStatus, Updater};
}
