//! Simulated update feed

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use deskkit_core::updater::{DownloadEvent, PendingUpdate, UpdateService};

/// Update feed that offers `latest` (if any) and streams a fake download
pub struct DemoFeed {
    latest: Option<String>,
    chunks: u64,
    chunk_delay: Duration,
    relaunches: Arc<AtomicUsize>,
}

impl DemoFeed {
    pub fn new(latest: Option<&str>) -> Self {
        Self {
            latest: latest.map(str::to_string),
            chunks: 8,
            chunk_delay: Duration::from_millis(60),
            relaunches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared relaunch counter, readable after the feed is moved into a provider
    pub fn relaunch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.relaunches)
    }
}

struct DemoUpdate {
    version: String,
    chunks: u64,
    chunk_delay: Duration,
}

const CHUNK_SIZE: u64 = 64 * 1024;

#[async_trait]
impl PendingUpdate for DemoUpdate {
    fn version(&self) -> &str {
        &self.version
    }

    fn current_version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn body(&self) -> Option<&str> {
        Some("Playground build with simulated download")
    }

    async fn download_and_install(
        &self,
        on_event: &mut (dyn FnMut(DownloadEvent) + Send),
    ) -> anyhow::Result<()> {
        on_event(DownloadEvent::Started {
            content_length: Some(self.chunks * CHUNK_SIZE),
        });
        for _ in 0..self.chunks {
            tokio::time::sleep(self.chunk_delay).await;
            on_event(DownloadEvent::Progress {
                chunk_length: CHUNK_SIZE,
            });
        }
        on_event(DownloadEvent::Finished);
        Ok(())
    }
}

#[async_trait]
impl UpdateService for DemoFeed {
    async fn check(&self) -> anyhow::Result<Option<Box<dyn PendingUpdate>>> {
        tracing::debug!(latest = ?self.latest, "demo feed check");
        Ok(self.latest.as_ref().map(|version| {
            Box::new(DemoUpdate {
                version: version.clone(),
                chunks: self.chunks,
                chunk_delay: self.chunk_delay,
            }) as Box<dyn PendingUpdate>
        }))
    }

    async fn relaunch(&self) -> anyhow::Result<()> {
        self.relaunches.fetch_add(1, Ordering::SeqCst);
        tracing::info!("relaunch requested");
        Ok(())
    }
}
