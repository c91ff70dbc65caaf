//! Tracing subscriber setup for hosts

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Level used for `deskkit_core` when `RUST_LOG` is not set
pub fn default_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "warn" }
}

/// `RUST_LOG` when set, else `deskkit_core` and `extra` at the default level
fn env_filter(extra: &[&str]) -> anyhow::Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(EnvFilter::from_default_env());
    }
    let mut filter = EnvFilter::new("warn");
    for target in std::iter::once("deskkit_core").chain(extra.iter().copied()) {
        filter = filter.add_directive(format!("{}={}", target, default_level()).parse()?);
    }
    Ok(filter)
}

/// Install a stderr fmt subscriber
///
/// `extra` names additional targets (usually the host crate) that log at
/// the default level.
pub fn init_tracing(extra: &[&str]) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(extra)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

/// Install a subscriber writing to `path`, for hosts that own the terminal
pub fn init_file_tracing(path: &Path, extra: &[&str]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(extra)?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
