//! Auto-update client
//!
//! [`Updater`] is the status machine behind the settings page update control:
//!
//! ```text
//! idle -> checking -> available | up-to-date | check-error
//! available -> downloading -> ready | download-error
//! ready -> relaunch
//! ```
//!
//! The update feed, download and relaunch are provided by an
//! [`UpdateService`]. Failures are stored on the updater and returned to the
//! caller; nothing retries on its own.

mod progress;
mod prompt;

pub use progress::{DownloadEvent, ProgressTracker, UpdateProgress};
pub use prompt::{Dialog, PromptOptions, check_and_prompt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Update failures kept on the updater for display
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Updater is disabled")]
    Disabled,

    #[error("No update available. Check for updates first.")]
    NoUpdateAvailable,

    #[error("Failed to check for updates: {0}")]
    Check(String),

    #[error("Failed to download update: {0}")]
    Download(String),

    #[error("Failed to relaunch: {0}")]
    Relaunch(String),
}

/// Where the update flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStatus {
    #[default]
    Idle,
    Checking,
    Available,
    UpToDate,
    CheckError,
    Downloading,
    Ready,
    DownloadError,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Available => "available",
            Self::UpToDate => "up-to-date",
            Self::CheckError => "check-error",
            Self::Downloading => "downloading",
            Self::Ready => "ready",
            Self::DownloadError => "download-error",
        }
    }

    /// True while a network step is running
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Checking | Self::Downloading)
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the last check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    /// Release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl UpdateInfo {
    pub fn none() -> Self {
        Self::default()
    }

    fn from_pending(update: &dyn PendingUpdate) -> Self {
        Self {
            available: true,
            version: Some(update.version().to_string()),
            current_version: Some(update.current_version().to_string()),
            body: update.body().map(str::to_string),
            date: update.date().map(str::to_string),
        }
    }
}

/// An update returned by [`UpdateService::check`]
#[async_trait]
pub trait PendingUpdate: Send + Sync {
    fn version(&self) -> &str;

    fn current_version(&self) -> &str;

    fn body(&self) -> Option<&str> {
        None
    }

    fn date(&self) -> Option<&str> {
        None
    }

    /// Download and stage the update, reporting through `on_event`
    async fn download_and_install(
        &self,
        on_event: &mut (dyn FnMut(DownloadEvent) + Send),
    ) -> anyhow::Result<()>;
}

/// Update feed and process control provided by the host
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// `None` when already up to date
    async fn check(&self) -> anyhow::Result<Option<Box<dyn PendingUpdate>>>;

    async fn relaunch(&self) -> anyhow::Result<()>;
}

/// Service used when the host does not provide one
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredService;

#[async_trait]
impl UpdateService for UnconfiguredService {
    async fn check(&self) -> anyhow::Result<Option<Box<dyn PendingUpdate>>> {
        anyhow::bail!("no update service configured")
    }

    async fn relaunch(&self) -> anyhow::Result<()> {
        anyhow::bail!("no update service configured")
    }
}

/// Update status machine
pub struct Updater {
    enabled: bool,
    service: Arc<dyn UpdateService>,
    status: UpdateStatus,
    info: Option<UpdateInfo>,
    pending: Option<Box<dyn PendingUpdate>>,
    progress: Option<UpdateProgress>,
    error: Option<UpdateError>,
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("enabled", &self.enabled)
            .field("status", &self.status)
            .field("info", &self.info)
            .field("progress", &self.progress)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Updater {
    pub fn new(service: Arc<dyn UpdateService>, enabled: bool) -> Self {
        Self {
            enabled,
            service,
            status: UpdateStatus::Idle,
            info: None,
            pending: None,
            progress: None,
            error: None,
        }
    }

    /// An updater that refuses every operation
    pub fn disabled() -> Self {
        Self::new(Arc::new(UnconfiguredService), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    pub fn info(&self) -> Option<&UpdateInfo> {
        self.info.as_ref()
    }

    pub fn progress(&self) -> Option<&UpdateProgress> {
        self.progress.as_ref()
    }

    pub fn error(&self) -> Option<&UpdateError> {
        self.error.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn fail(&mut self, err: UpdateError) -> UpdateError {
        self.error = Some(err.clone());
        err
    }

    /// Ask the service for a newer version
    ///
    /// A successful check replaces any pending update.
    pub async fn check(&mut self) -> Result<UpdateInfo, UpdateError> {
        if !self.enabled {
            return Err(self.fail(UpdateError::Disabled));
        }

        self.status = UpdateStatus::Checking;
        self.error = None;
        tracing::debug!("checking for updates");

        match self.service.check().await {
            Ok(Some(update)) => {
                let info = UpdateInfo::from_pending(update.as_ref());
                tracing::info!(version = ?info.version, "update available");
                self.pending = Some(update);
                self.info = Some(info.clone());
                self.status = UpdateStatus::Available;
                Ok(info)
            }
            Ok(None) => {
                tracing::debug!("already up to date");
                self.pending = None;
                self.info = Some(UpdateInfo::none());
                self.status = UpdateStatus::UpToDate;
                Ok(UpdateInfo::none())
            }
            Err(e) => {
                tracing::warn!(error = %e, "update check failed");
                self.status = UpdateStatus::CheckError;
                Err(self.fail(UpdateError::Check(format!("{:#}", e))))
            }
        }
    }

    /// Download and stage the pending update
    ///
    /// Only valid after a successful check, or to retry a failed download.
    pub async fn download<F>(&mut self, mut on_progress: F) -> Result<(), UpdateError>
    where
        F: FnMut(&UpdateProgress) + Send,
    {
        if !self.enabled {
            return Err(self.fail(UpdateError::Disabled));
        }
        if !matches!(self.status, UpdateStatus::Available | UpdateStatus::DownloadError) {
            return Err(UpdateError::NoUpdateAvailable);
        }
        let Some(pending) = self.pending.as_deref() else {
            return Err(UpdateError::NoUpdateAvailable);
        };

        self.status = UpdateStatus::Downloading;
        self.error = None;
        let start = UpdateProgress::default();
        on_progress(&start);

        let mut tracker = ProgressTracker::new();
        let mut latest = start;
        let result = {
            let mut sink = |event: DownloadEvent| {
                let progress = tracker.on_event(event);
                on_progress(&progress);
                latest = progress;
            };
            pending.download_and_install(&mut sink).await
        };
        self.progress = Some(latest);

        match result {
            Ok(()) => {
                tracing::info!("update downloaded");
                self.status = UpdateStatus::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "update download failed");
                self.status = UpdateStatus::DownloadError;
                Err(self.fail(UpdateError::Download(format!("{:#}", e))))
            }
        }
    }

    /// Restart into the new version
    pub async fn install(&mut self) -> Result<(), UpdateError> {
        if !self.enabled {
            return Err(self.fail(UpdateError::Disabled));
        }
        tracing::info!("relaunching to apply update");
        let result = self.service.relaunch().await;
        result.map_err(|e| self.fail(UpdateError::Relaunch(format!("{:#}", e))))
    }

    /// Drop the pending update and return to idle
    pub fn clear(&mut self) {
        self.pending = None;
        self.info = None;
        self.progress = None;
        self.error = None;
        self.status = UpdateStatus::Idle;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted update service
    #[derive(Default)]
    pub struct MockService {
        pub version: Option<String>,
        pub content_length: Option<u64>,
        pub chunks: Vec<u64>,
        pub fail_check: bool,
        pub fail_download: Arc<Mutex<bool>>,
        pub checks: AtomicUsize,
        pub relaunches: AtomicUsize,
    }

    impl MockService {
        pub fn with_update(version: &str, content_length: Option<u64>, chunks: Vec<u64>) -> Self {
            Self {
                version: Some(version.to_string()),
                content_length,
                chunks,
                ..Default::default()
            }
        }

        pub fn checks(&self) -> usize {
            self.checks.load(Ordering::SeqCst)
        }
    }

    struct MockUpdate {
        version: String,
        content_length: Option<u64>,
        chunks: Vec<u64>,
        fail: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl PendingUpdate for MockUpdate {
        fn version(&self) -> &str {
            &self.version
        }

        fn current_version(&self) -> &str {
            "1.0.0"
        }

        fn body(&self) -> Option<&str> {
            Some("Bug fixes")
        }

        async fn download_and_install(
            &self,
            on_event: &mut (dyn FnMut(DownloadEvent) + Send),
        ) -> anyhow::Result<()> {
            on_event(DownloadEvent::Started {
                content_length: self.content_length,
            });
            for chunk in &self.chunks {
                on_event(DownloadEvent::Progress {
                    chunk_length: *chunk,
                });
            }
            if *self.fail.lock().unwrap() {
                anyhow::bail!("connection reset");
            }
            on_event(DownloadEvent::Finished);
            Ok(())
        }
    }

    #[async_trait]
    impl UpdateService for MockService {
        async fn check(&self) -> anyhow::Result<Option<Box<dyn PendingUpdate>>> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            if self.fail_check {
                anyhow::bail!("feed unreachable");
            }
            Ok(self.version.as_ref().map(|version| {
                Box::new(MockUpdate {
                    version: version.clone(),
                    content_length: self.content_length,
                    chunks: self.chunks.clone(),
                    fail: Arc::clone(&self.fail_download),
                }) as Box<dyn PendingUpdate>
            }))
        }

        async fn relaunch(&self) -> anyhow::Result<()> {
            self.relaunches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockService;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_disabled_never_calls_service() {
        let service = Arc::new(MockService::with_update("2.0.0", Some(10), vec![10]));
        let mut updater = Updater::new(service.clone(), false);

        assert_eq!(updater.check().await, Err(UpdateError::Disabled));
        assert_eq!(updater.download(|_| {}).await, Err(UpdateError::Disabled));
        assert_eq!(updater.install().await, Err(UpdateError::Disabled));

        assert_eq!(service.checks(), 0);
        assert_eq!(service.relaunches.load(Ordering::SeqCst), 0);
        assert_eq!(updater.status(), UpdateStatus::Idle);
        assert_eq!(updater.error(), Some(&UpdateError::Disabled));
    }

    #[tokio::test]
    async fn test_download_from_idle() {
        let service = Arc::new(MockService::with_update("2.0.0", Some(10), vec![10]));
        let mut updater = Updater::new(service, true);

        assert_eq!(updater.download(|_| {}).await, Err(UpdateError::NoUpdateAvailable));
        assert_eq!(updater.status(), UpdateStatus::Idle);
        assert!(updater.progress().is_none());
    }

    #[tokio::test]
    async fn test_full_flow() {
        let service = Arc::new(MockService::with_update("2.0.0", Some(200), vec![50, 50, 100]));
        let mut updater = Updater::new(service.clone(), true);

        let info = updater.check().await.unwrap();
        assert!(info.available);
        assert_eq!(info.version.as_deref(), Some("2.0.0"));
        assert_eq!(info.current_version.as_deref(), Some("1.0.0"));
        assert_eq!(info.body.as_deref(), Some("Bug fixes"));
        assert_eq!(updater.status(), UpdateStatus::Available);

        let mut seen = Vec::new();
        updater.download(|p| seen.push(p.percent)).await.unwrap();
        assert_eq!(seen, vec![0, 0, 25, 50, 100, 100]);
        assert_eq!(updater.status(), UpdateStatus::Ready);
        assert_eq!(updater.progress().map(|p| p.downloaded), Some(200));

        updater.install().await.unwrap();
        assert_eq!(service.relaunches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_total_keeps_percent_zero() {
        let service = Arc::new(MockService::with_update("2.0.0", None, vec![10, 20]));
        let mut updater = Updater::new(service, true);
        updater.check().await.unwrap();

        let mut seen = Vec::new();
        updater.download(|p| seen.push(p.percent)).await.unwrap();
        assert!(seen.iter().all(|p| *p == 0));
    }

    #[tokio::test]
    async fn test_up_to_date_clears_pending() {
        let service = Arc::new(MockService::default());
        let mut updater = Updater::new(service, true);

        let info = updater.check().await.unwrap();
        assert!(!info.available);
        assert_eq!(updater.status(), UpdateStatus::UpToDate);
        assert!(!updater.has_pending());
        assert_eq!(updater.download(|_| {}).await, Err(UpdateError::NoUpdateAvailable));
        assert_eq!(updater.status(), UpdateStatus::UpToDate);
    }

    #[tokio::test]
    async fn test_check_error() {
        let service = Arc::new(MockService {
            fail_check: true,
            ..Default::default()
        });
        let mut updater = Updater::new(service, true);

        let err = updater.check().await.unwrap_err();
        assert!(matches!(err, UpdateError::Check(ref msg) if msg.contains("feed unreachable")));
        assert_eq!(updater.status(), UpdateStatus::CheckError);
        assert_eq!(updater.error(), Some(&err));
    }

    #[tokio::test]
    async fn test_download_error_then_retry() {
        let service = Arc::new(MockService::with_update("2.0.0", Some(10), vec![5]));
        *service.fail_download.lock().unwrap() = true;
        let mut updater = Updater::new(service.clone(), true);
        updater.check().await.unwrap();

        let err = updater.download(|_| {}).await.unwrap_err();
        assert!(matches!(err, UpdateError::Download(_)));
        assert_eq!(updater.status(), UpdateStatus::DownloadError);
        assert_eq!(updater.progress().map(|p| p.percent), Some(50));

        *service.fail_download.lock().unwrap() = false;
        updater.download(|_| {}).await.unwrap();
        assert_eq!(updater.status(), UpdateStatus::Ready);
        assert!(updater.error().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let service = Arc::new(MockService::with_update("2.0.0", Some(10), vec![10]));
        let mut updater = Updater::new(service, true);
        updater.check().await.unwrap();
        updater.clear();

        assert_eq!(updater.status(), UpdateStatus::Idle);
        assert!(updater.info().is_none());
        assert_eq!(updater.download(|_| {}).await, Err(UpdateError::NoUpdateAvailable));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(UpdateStatus::CheckError.as_str(), "check-error");
        assert_eq!(
            serde_json::to_string(&UpdateStatus::UpToDate).unwrap(),
            "\"up-to-date\""
        );
    }
}
