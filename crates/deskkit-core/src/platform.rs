//! Native window collaborator

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Window operations provided by the native runtime
#[async_trait]
pub trait WindowControls: Send + Sync {
    async fn minimize(&self) -> anyhow::Result<()>;

    async fn toggle_maximize(&self) -> anyhow::Result<()>;

    async fn is_maximized(&self) -> anyhow::Result<bool>;

    async fn close(&self) -> anyhow::Result<()>;
}

/// Window stand-in for hosts without native chrome (terminal, tests)
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    maximized: AtomicBool,
    minimized: AtomicUsize,
    closed: AtomicBool,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimize_count(&self) -> usize {
        self.minimized.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WindowControls for HeadlessWindow {
    async fn minimize(&self) -> anyhow::Result<()> {
        self.minimized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn toggle_maximize(&self) -> anyhow::Result<()> {
        self.maximized.fetch_xor(true, Ordering::Relaxed);
        Ok(())
    }

    async fn is_maximized(&self) -> anyhow::Result<bool> {
        Ok(self.maximized.load(Ordering::Relaxed))
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
