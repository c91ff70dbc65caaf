//! Composition root
//!
//! [`Provider`] collects the caller's config and collaborators, then
//! [`Provider::mount`] builds an [`AppContext`] in order: config merge,
//! diagnostics, translations, database, theme, updater. A failure in one of
//! these stages comes back as an [`InitFailure`] with a screen to show.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{Config, PartialConfig, merge};
use crate::diagnostics::{Diagnostics, Reporter};
use crate::error::{Error, Result};
use crate::i18n::{I18n, LANGUAGE_KEY, TranslationEngine};
use crate::platform::{HeadlessWindow, WindowControls};
use crate::storage::{Database, DatabaseOptions, default_data_dir};
use crate::theme::mode::{load_mode, save_mode};
use crate::theme::{StyleSheet, ThemeEffect, ThemeMode};
use crate::ui::fallback::{database_error_screen, init_error_screen};
use crate::ui::{
    Action, ChromeState, Dispatched, ErrorBoundary, Node, RenderContext, Router, SettingsTab,
    ShellProps, UpdateView, dispatch,
};
use crate::updater::{UnconfiguredService, UpdateService, Updater};
use crate::version_check::{LatestVersionSource, log_update_notice};

/// Startup stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    Config,
    I18n,
    Database,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "configuration",
            Self::I18n => "translations",
            Self::Database => "database",
        })
    }
}

/// Mount failure with the static screen to render instead of the app
#[derive(Debug, Error)]
#[error("{stage} initialization failed: {error}")]
pub struct InitFailure {
    pub stage: InitStage,
    #[source]
    pub error: Error,
    pub screen: Node,
}

impl InitFailure {
    fn new(stage: InitStage, error: Error) -> Self {
        tracing::error!(%stage, error = %error, "initialization failed");
        // the error chain is only shown to developers
        let detail = cfg!(debug_assertions).then(|| error_chain(&error));
        let message = error.to_string();
        let screen = match stage {
            InitStage::Database => database_error_screen(&message, detail.as_deref()),
            _ => init_error_screen(
                &format!("Failed to load {}", stage),
                &message,
                detail.as_deref(),
            ),
        };
        Self {
            stage,
            error,
            screen,
        }
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut lines = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

/// Builder for [`AppContext`]
pub struct Provider {
    config: PartialConfig,
    file_config: Option<PartialConfig>,
    update_service: Option<Arc<dyn UpdateService>>,
    translation_engine: Option<Box<dyn TranslationEngine>>,
    reporter: Option<Arc<dyn Reporter>>,
    window: Option<Arc<dyn WindowControls>>,
    version_source: Option<Arc<dyn LatestVersionSource>>,
    data_dir: Option<PathBuf>,
    prefers_dark: bool,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("config", &self.config)
            .field("file_config", &self.file_config)
            .field("data_dir", &self.data_dir)
            .field("prefers_dark", &self.prefers_dark)
            .finish_non_exhaustive()
    }
}

impl Provider {
    pub fn new(config: PartialConfig) -> Self {
        Self {
            config,
            file_config: None,
            update_service: None,
            translation_engine: None,
            reporter: None,
            window: None,
            version_source: None,
            data_dir: None,
            prefers_dark: false,
        }
    }

    /// Config loaded from `deskkit.toml`; code config wins over it
    pub fn with_file_config(mut self, file_config: PartialConfig) -> Self {
        self.file_config = Some(file_config);
        self
    }

    pub fn with_update_service(mut self, service: Arc<dyn UpdateService>) -> Self {
        self.update_service = Some(service);
        self
    }

    pub fn with_translation_engine(mut self, engine: Box<dyn TranslationEngine>) -> Self {
        self.translation_engine = Some(engine);
        self
    }

    /// Report through `reporter` instead of the configured Sentry DSN
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_window_controls(mut self, window: Arc<dyn WindowControls>) -> Self {
        self.window = Some(window);
        self
    }

    /// Registry lookup for the core version notice, checked in debug builds
    pub fn with_version_source(mut self, source: Arc<dyn LatestVersionSource>) -> Self {
        self.version_source = Some(source);
        self
    }

    /// Directory relative database names resolve against
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Host dark-mode preference, used by [`ThemeMode::System`]
    pub fn prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    /// Build the app context
    pub async fn mount(self) -> std::result::Result<AppContext, InitFailure> {
        let partial = match self.file_config {
            Some(file) => file.overlay(self.config),
            None => self.config,
        };
        partial
            .validate()
            .map_err(|e| InitFailure::new(InitStage::Config, e))?;
        let config = Arc::new(merge(Config::default(), partial));
        let features = config.features;

        let diagnostics = match self.reporter {
            Some(reporter) => Diagnostics::with_reporter(reporter),
            None => Diagnostics::init(&config.sentry, features.sentry),
        };

        let mut i18n = match self.translation_engine {
            Some(engine) => I18n::with_engine(engine, &config.i18n),
            None => I18n::bootstrap(&config.i18n),
        }
        .map_err(|e| InitFailure::new(InitStage::I18n, e))?;

        let database = if features.database {
            let data_dir = self.data_dir.unwrap_or_else(default_data_dir);
            let options = DatabaseOptions::from_config(&config.database, &data_dir);
            let db = Database::new(options)
                .await
                .map_err(|e| InitFailure::new(InitStage::Database, e))?;
            Some(db)
        } else {
            tracing::debug!("database feature disabled");
            None
        };

        let mut theme_mode = ThemeMode::default();
        if let Some(db) = &database {
            let settings = db.settings();
            match load_mode(&settings).await {
                Ok(mode) => theme_mode = mode,
                Err(e) => tracing::warn!(error = %e, "failed to load theme mode"),
            }
            match settings.get(LANGUAGE_KEY).await {
                Ok(Some(stored)) => {
                    if let Some(language) = stored.as_str().filter(|l| i18n.is_supported(l)) {
                        if let Err(e) = i18n.change_language(language) {
                            tracing::warn!(error = %e, "failed to restore language");
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "failed to load language"),
            }
        }

        if cfg!(debug_assertions) {
            if let Some(source) = self.version_source {
                tokio::spawn(log_update_notice(source));
            }
        }

        let mut styles = StyleSheet::default();
        let mut theme_effect = ThemeEffect::new();
        theme_effect.run(&config, &mut styles);
        theme_mode.apply(self.prefers_dark, &mut styles);

        let service = self
            .update_service
            .unwrap_or_else(|| Arc::new(UnconfiguredService));
        let updater = Updater::new(service, features.updater);

        let window = self.window.unwrap_or_else(|| Arc::new(HeadlessWindow::new()));
        let maximized = window.is_maximized().await.unwrap_or(false);

        tracing::info!(
            brand = %config.brand.name,
            database = database.is_some(),
            updater = features.updater,
            language = i18n.language(),
            "app mounted"
        );

        Ok(AppContext {
            config,
            i18n,
            database,
            updater,
            diagnostics,
            window,
            styles,
            theme_effect,
            theme_mode,
            prefers_dark: self.prefers_dark,
            maximized,
            settings_tab: SettingsTab::default(),
            boundary: ErrorBoundary::new(),
        })
    }
}

/// Everything the running app owns
pub struct AppContext {
    config: Arc<Config>,
    i18n: I18n,
    database: Option<Database>,
    updater: Updater,
    diagnostics: Diagnostics,
    window: Arc<dyn WindowControls>,
    styles: StyleSheet,
    theme_effect: ThemeEffect,
    theme_mode: ThemeMode,
    prefers_dark: bool,
    maximized: bool,
    settings_tab: SettingsTab,
    boundary: ErrorBoundary,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("i18n", &self.i18n)
            .field("database", &self.database.is_some())
            .field("updater", &self.updater)
            .field("theme_mode", &self.theme_mode)
            .field("maximized", &self.maximized)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn i18n_mut(&mut self) -> &mut I18n {
        &mut self.i18n
    }

    /// The open database; an error when `features.database` is off
    pub fn database(&self) -> Result<&Database> {
        self.database.as_ref().ok_or(Error::NotInitialized("database"))
    }

    pub fn updater(&self) -> &Updater {
        &self.updater
    }

    pub fn updater_mut(&mut self) -> &mut Updater {
        &mut self.updater
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    /// The host's dark preference changed
    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
        self.theme_mode.apply(prefers_dark, &mut self.styles);
    }

    /// Re-apply the theme if `config` is a different instance
    pub fn refresh_theme(&mut self) -> bool {
        let applied = self.theme_effect.run(&self.config, &mut self.styles);
        if applied {
            self.theme_mode.apply(self.prefers_dark, &mut self.styles);
        }
        applied
    }

    pub fn chrome(&self) -> ChromeState {
        ChromeState {
            theme_mode: self.theme_mode,
            maximized: self.maximized,
            settings_tab: self.settings_tab,
            update: UpdateView::from_updater(&self.updater),
        }
    }

    /// Context for rendering outside the shell, e.g. a routed page
    pub fn render_context<'a>(&'a self, router: &'a dyn Router) -> RenderContext<'a> {
        RenderContext::new(&self.config, &self.i18n, router).with_chrome(self.chrome())
    }

    /// Render the shell inside the error boundary
    pub fn render(&mut self, router: &dyn Router, props: &ShellProps) -> Node {
        let chrome = self.chrome();
        let cx = RenderContext::new(&self.config, &self.i18n, router).with_chrome(chrome);
        self.boundary
            .render(&self.diagnostics, || Ok(cx.render_shell(props)))
    }

    /// Apply an action emitted by the rendered tree
    ///
    /// Update failures are stored on the updater and shown by the settings
    /// page, they are not returned. `Custom` actions come back to the caller.
    pub async fn handle(&mut self, action: Action, router: &dyn Router) -> Result<Option<Action>> {
        self.diagnostics
            .add_breadcrumb(&format!("{:?}", action), "action", crate::diagnostics::Level::Info);

        let action = match dispatch(action, router) {
            Dispatched::Navigated(_) => return Ok(None),
            Dispatched::Unhandled(action) => action,
        };

        match action {
            Action::Minimize => self.window_op(self.window.minimize().await)?,
            Action::ToggleMaximize => {
                self.window_op(self.window.toggle_maximize().await)?;
                self.maximized = self
                    .window
                    .is_maximized()
                    .await
                    .map_err(|e| Error::Window(format!("{:#}", e)))?;
            }
            Action::CloseWindow => self.window_op(self.window.close().await)?,
            Action::Reload => self.boundary.reset(),
            Action::GoHome => {
                self.boundary.reset();
                router.navigate("/");
            }
            Action::CheckForUpdates => {
                if let Err(e) = self.updater.check().await {
                    tracing::debug!(error = %e, "update check did not complete");
                }
            }
            Action::DownloadUpdate => {
                if let Err(e) = self.updater.download(|_| {}).await {
                    tracing::debug!(error = %e, "update download did not complete");
                }
            }
            Action::InstallUpdate => {
                if let Err(e) = self.updater.install().await {
                    tracing::warn!(error = %e, "relaunch failed");
                }
            }
            Action::ChangeLanguage(language) => {
                self.i18n.change_language(&language)?;
                if let Some(db) = &self.database {
                    db.settings().set(LANGUAGE_KEY, language.as_str()).await?;
                }
            }
            Action::SetThemeMode(mode) => {
                self.theme_mode = mode;
                mode.apply(self.prefers_dark, &mut self.styles);
                if let Some(db) = &self.database {
                    save_mode(&db.settings(), mode).await?;
                }
            }
            Action::SelectSettingsTab(tab) => self.settings_tab = tab,
            custom @ Action::Custom(_) => return Ok(Some(custom)),
            // routed by dispatch above
            Action::Navigate(_) => {}
        }
        Ok(None)
    }

    fn window_op(&self, result: anyhow::Result<()>) -> Result<()> {
        result.map_err(|e| Error::Window(format!("{:#}", e)))
    }

    /// Close the database
    pub async fn shutdown(self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
        tracing::info!("app shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PartialDatabase, PartialFeatures};
    use crate::diagnostics::testing::RecordingReporter;
    use crate::ui::{MemoryRouter, ShellProps};
    use crate::updater::UpdateStatus;
    use crate::updater::testing::MockService;

    fn memory_config() -> PartialConfig {
        PartialConfig {
            database: Some(PartialDatabase {
                name: Some(":memory:".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mount_and_render() {
        let mut app = Provider::new(memory_config()).mount().await.unwrap();
        let router = MemoryRouter::new("/");

        let node = app.render(&router, &ShellProps::default());
        assert!(node.region("title-bar").is_some());
        assert!(node.region("nav").is_some());
        assert!(app.database().is_ok());
        assert_eq!(app.styles().color_scheme(), Some(crate::theme::ColorScheme::Light));
    }

    struct ChannelSource(tokio::sync::mpsc::UnboundedSender<()>);

    #[async_trait::async_trait]
    impl LatestVersionSource for ChannelSource {
        async fn latest_version(&self) -> anyhow::Result<Option<String>> {
            let _ = self.0.send(());
            Ok(Some("999.0.0".to_string()))
        }
    }

    #[tokio::test]
    async fn test_mount_checks_core_version_in_debug_builds() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _app = Provider::new(memory_config())
            .with_version_source(Arc::new(ChannelSource(tx)))
            .mount()
            .await
            .unwrap();
        assert_eq!(rx.recv().await.is_some(), cfg!(debug_assertions));
    }

    #[tokio::test]
    async fn test_database_disabled() {
        let config = PartialConfig {
            features: Some(PartialFeatures {
                database: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let app = Provider::new(config).mount().await.unwrap();
        assert!(matches!(app.database(), Err(Error::NotInitialized("database"))));
    }

    #[tokio::test]
    async fn test_invalid_config_fails_mount() {
        let config = PartialConfig {
            sentry: Some(crate::config::SentryConfig {
                traces_sample_rate: Some(2.0),
                ..Default::default()
            }),
            ..memory_config()
        };
        let failure = Provider::new(config).mount().await.unwrap_err();
        assert_eq!(failure.stage, InitStage::Config);
        assert!(failure.screen.region("init-error").is_some());
    }

    #[tokio::test]
    async fn test_broken_migration_shows_database_screen() {
        let config = PartialConfig {
            database: Some(PartialDatabase {
                name: Some(":memory:".into()),
                migrations: Some(vec![crate::storage::Migration::new(10, "broken", "NOT SQL")]),
            }),
            ..Default::default()
        };
        let failure = Provider::new(config).mount().await.unwrap_err();
        assert_eq!(failure.stage, InitStage::Database);
        assert!(failure.screen.region("database-error").is_some());
    }

    #[tokio::test]
    async fn test_theme_mode_persists() {
        let mut app = Provider::new(memory_config()).prefers_dark(true).mount().await.unwrap();
        let router = MemoryRouter::new("/");
        assert_eq!(app.styles().color_scheme(), Some(crate::theme::ColorScheme::Dark));

        app.handle(Action::SetThemeMode(ThemeMode::Light), &router).await.unwrap();
        assert_eq!(app.theme_mode(), ThemeMode::Light);
        assert_eq!(app.styles().color_scheme(), Some(crate::theme::ColorScheme::Light));

        let settings = app.database().unwrap().settings();
        assert_eq!(load_mode(&settings).await.unwrap(), ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_handle_routes_and_window() {
        let window = Arc::new(HeadlessWindow::new());
        let mut app = Provider::new(memory_config())
            .with_window_controls(window.clone())
            .mount()
            .await
            .unwrap();
        let router = MemoryRouter::new("/");

        app.handle(Action::Navigate("/settings".into()), &router).await.unwrap();
        assert_eq!(router.current_path(), "/settings");

        app.handle(Action::ToggleMaximize, &router).await.unwrap();
        assert!(app.chrome().maximized);

        app.handle(Action::SelectSettingsTab(SettingsTab::About), &router).await.unwrap();
        assert_eq!(app.chrome().settings_tab, SettingsTab::About);

        let custom = app.handle(Action::Custom("export".into()), &router).await.unwrap();
        assert_eq!(custom, Some(Action::Custom("export".into())));

        app.handle(Action::GoHome, &router).await.unwrap();
        assert_eq!(router.current_path(), "/");
    }

    #[tokio::test]
    async fn test_update_errors_are_stored_not_returned() {
        let service = Arc::new(MockService {
            fail_check: true,
            ..Default::default()
        });
        let mut app = Provider::new(memory_config())
            .with_update_service(service)
            .mount()
            .await
            .unwrap();
        let router = MemoryRouter::new("/");

        app.handle(Action::CheckForUpdates, &router).await.unwrap();
        assert_eq!(app.updater().status(), UpdateStatus::CheckError);
        assert_eq!(app.chrome().update.status, UpdateStatus::CheckError);
    }

    #[tokio::test]
    async fn test_language_change_persists() {
        let mut app = Provider::new(memory_config()).mount().await.unwrap();
        let router = MemoryRouter::new("/");

        app.handle(Action::ChangeLanguage("zh".into()), &router).await.unwrap();
        assert_eq!(app.i18n().language(), "zh");
        let stored = app.database().unwrap().settings().get(LANGUAGE_KEY).await.unwrap();
        assert_eq!(stored, Some(serde_json::json!("zh")));

        assert!(app.handle(Action::ChangeLanguage("xx".into()), &router).await.is_err());
    }

    #[tokio::test]
    async fn test_boundary_reports_panics() {
        let reporter = Arc::new(RecordingReporter::default());
        let config = PartialConfig {
            components: Some(crate::config::ComponentOverrides {
                shell: Some(crate::ui::Override::from_fn(|_cx, _props: &ShellProps| {
                    panic!("custom shell broke")
                })),
                ..Default::default()
            }),
            ..memory_config()
        };
        let mut app = Provider::new(config)
            .with_reporter(reporter.clone())
            .mount()
            .await
            .unwrap();
        let router = MemoryRouter::new("/");

        let node = app.render(&router, &ShellProps::default());
        assert!(node.region("recovery").is_some());
        assert_eq!(reporter.messages.lock().unwrap().len(), 1);

        app.handle(Action::Reload, &router).await.unwrap();
        assert!(!app.boundary().state().is_failed());
    }
}
