//! Error reporting
//!
//! [`Diagnostics`] forwards errors, breadcrumbs and user context to a
//! [`Reporter`]. Without a DSN (or without the `sentry` feature) it only logs.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::config::SentryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
}

/// Error reporting backend
pub trait Reporter: Send + Sync {
    fn capture_error(&self, error: &(dyn StdError + 'static));

    fn capture_message(&self, message: &str, level: Level);

    /// `None` clears the user
    fn set_user(&self, user: Option<&User>);

    fn add_breadcrumb(&self, message: &str, category: &str, level: Level);
}

/// Handle held by the app context
#[derive(Clone, Default)]
pub struct Diagnostics {
    reporter: Option<Arc<dyn Reporter>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Diagnostics {
    /// Log-only diagnostics
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_reporter(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            reporter: Some(reporter),
        }
    }

    /// Set up reporting from config
    ///
    /// A missing or empty DSN, or `enabled = false`, gives log-only
    /// diagnostics. An unparsable DSN is logged and ignored.
    pub fn init(config: &SentryConfig, enabled: bool) -> Self {
        let dsn = match config.dsn.as_deref() {
            Some(dsn) if enabled && !dsn.trim().is_empty() => dsn,
            _ => {
                tracing::debug!("Sentry DSN not configured, skipping initialization");
                return Self::disabled();
            }
        };

        #[cfg(feature = "sentry")]
        {
            match sentry_backend::SentryReporter::init(dsn, config) {
                Ok(reporter) => {
                    tracing::info!("error reporting enabled");
                    Self::with_reporter(Arc::new(reporter))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "invalid Sentry DSN, error reporting disabled");
                    Self::disabled()
                }
            }
        }

        #[cfg(not(feature = "sentry"))]
        {
            tracing::warn!(
                dsn_len = dsn.len(),
                "Sentry DSN configured but deskkit-core was built without the `sentry` feature"
            );
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.reporter.is_some()
    }

    pub fn capture_error(&self, error: &(dyn StdError + 'static)) {
        tracing::error!(error = %error, "captured error");
        if let Some(reporter) = &self.reporter {
            reporter.capture_error(error);
        }
    }

    pub fn capture_message(&self, message: &str, level: Level) {
        match level {
            Level::Error => tracing::error!("{}", message),
            Level::Warning => tracing::warn!("{}", message),
            Level::Info => tracing::info!("{}", message),
            Level::Debug => tracing::debug!("{}", message),
        }
        if let Some(reporter) = &self.reporter {
            reporter.capture_message(message, level);
        }
    }

    pub fn set_user(&self, user: Option<&User>) {
        if let Some(reporter) = &self.reporter {
            reporter.set_user(user);
        }
    }

    pub fn add_breadcrumb(&self, message: &str, category: &str, level: Level) {
        tracing::trace!(category, text = message, "breadcrumb");
        if let Some(reporter) = &self.reporter {
            reporter.add_breadcrumb(message, category, level);
        }
    }
}

#[cfg(feature = "sentry")]
mod sentry_backend {
    use super::*;
    use sentry::types::Dsn;

    pub struct SentryReporter {
        _guard: sentry::ClientInitGuard,
    }

    impl From<Level> for sentry::Level {
        fn from(level: Level) -> Self {
            match level {
                Level::Debug => sentry::Level::Debug,
                Level::Info => sentry::Level::Info,
                Level::Warning => sentry::Level::Warning,
                Level::Error => sentry::Level::Error,
            }
        }
    }

    impl SentryReporter {
        pub fn init(dsn: &str, config: &SentryConfig) -> Result<Self, sentry::types::ParseDsnError> {
            let dsn: Dsn = dsn.parse()?;
            let default_environment = if cfg!(debug_assertions) {
                "development"
            } else {
                "production"
            };
            let environment = config
                .environment
                .clone()
                .unwrap_or_else(|| default_environment.to_string());

            let guard = sentry::init(sentry::ClientOptions {
                dsn: Some(dsn),
                release: sentry::release_name!(),
                environment: Some(environment.into()),
                // Don't send in debug builds
                sample_rate: if cfg!(debug_assertions) { 0.0 } else { 1.0 },
                traces_sample_rate: config.traces_sample_rate.unwrap_or(0.1),
                ..Default::default()
            });
            Ok(Self { _guard: guard })
        }
    }

    impl Reporter for SentryReporter {
        fn capture_error(&self, error: &(dyn StdError + 'static)) {
            sentry::capture_error(error);
        }

        fn capture_message(&self, message: &str, level: Level) {
            sentry::capture_message(message, level.into());
        }

        fn set_user(&self, user: Option<&User>) {
            let user = user.map(|u| sentry::User {
                id: Some(u.id.clone()),
                email: u.email.clone(),
                username: u.username.clone(),
                ..Default::default()
            });
            sentry::configure_scope(|scope| scope.set_user(user));
        }

        fn add_breadcrumb(&self, message: &str, category: &str, level: Level) {
            sentry::add_breadcrumb(sentry::Breadcrumb {
                message: Some(message.to_string()),
                category: Some(category.to_string()),
                level: level.into(),
                ..Default::default()
            });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;

    #[test]
    fn test_no_dsn_is_disabled() {
        assert!(!Diagnostics::init(&SentryConfig::default(), true).is_enabled());

        let config = SentryConfig {
            dsn: Some("  ".into()),
            ..Default::default()
        };
        assert!(!Diagnostics::init(&config, true).is_enabled());

        let config = SentryConfig {
            dsn: Some("https://key@example.com/1".into()),
            ..Default::default()
        };
        assert!(!Diagnostics::init(&config, false).is_enabled());
    }

    #[test]
    fn test_forwards_to_reporter() {
        let reporter = Arc::new(RecordingReporter::default());
        let diagnostics = Diagnostics::with_reporter(reporter.clone());

        let err = crate::Error::Other("boom".into());
        diagnostics.capture_error(&err);
        diagnostics.capture_message("hello", Level::Warning);
        diagnostics.add_breadcrumb("opened settings", "navigation", Level::Info);
        diagnostics.set_user(Some(&User {
            id: "42".into(),
            ..Default::default()
        }));

        assert_eq!(*reporter.errors.lock().unwrap(), vec!["boom"]);
        assert_eq!(
            *reporter.messages.lock().unwrap(),
            vec![("hello".to_string(), Level::Warning)]
        );
        assert_eq!(
            *reporter.breadcrumbs.lock().unwrap(),
            vec!["navigation: opened settings"]
        );
        assert_eq!(reporter.user.lock().unwrap().as_ref().map(|u| u.id.as_str()), Some("42"));

        diagnostics.set_user(None);
        assert!(reporter.user.lock().unwrap().is_none());
    }
}
