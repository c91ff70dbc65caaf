//! Error types for deskkit

use thiserror::Error;

use crate::updater::UpdateError;

/// Result type alias using deskkit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Deskkit error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Initialization errors (E001-E099)
    #[error("{0} is not initialized. Enable it in `features` before using it.")]
    NotInitialized(&'static str),

    // Database errors (E100-E199)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration v{version} ({name}) failed: {source}")]
    MigrationFailed {
        version: i64,
        name: String,
        #[source]
        source: sqlx::Error,
    },

    // Update errors (E200-E299)
    #[error(transparent)]
    Update(#[from] UpdateError),

    // Config errors (E300-E399)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Serialization errors (E400-E499)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // i18n errors (E500-E599)
    #[error("Translation resources for '{0}' must be a JSON object")]
    InvalidResources(String),

    // Window errors (E600-E699)
    #[error("Window operation failed: {0}")]
    Window(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized(_) => "E001",
            Self::DatabaseError(_) => "E100",
            Self::MigrationFailed { .. } => "E101",
            Self::Update(UpdateError::Disabled) => "E200",
            Self::Update(UpdateError::NoUpdateAvailable) => "E201",
            Self::Update(UpdateError::Check(_)) => "E202",
            Self::Update(UpdateError::Download(_)) => "E203",
            Self::Update(UpdateError::Relaunch(_)) => "E204",
            Self::ConfigError(_) => "E300",
            Self::ConfigParse(_) => "E301",
            Self::Serialization(_) => "E400",
            Self::InvalidResources(_) => "E500",
            Self::Window(_) => "E600",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotInitialized(what) => Some(format!("set features.{} = true", what)),
            Self::Update(UpdateError::Disabled) => Some("set features.updater = true".to_string()),
            Self::Update(UpdateError::NoUpdateAvailable) => {
                Some("run an update check before downloading".to_string())
            }
            Self::MigrationFailed { version, .. } => {
                Some(format!("inspect the `up` statement of migration v{}", version))
            }
            Self::ConfigParse(_) => Some("check deskkit.toml for typos".to_string()),
            _ => None,
        }
    }
}
