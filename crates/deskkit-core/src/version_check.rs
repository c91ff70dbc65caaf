//! Development notice for newer deskkit-core releases
//!
//! Debug builds can ask a [`LatestVersionSource`] (typically a crates.io
//! lookup supplied by the host) for the newest published version and log a
//! hint when this build is behind. Release builds never check.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Version of this crate
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where the newest published version comes from
#[async_trait]
pub trait LatestVersionSource: Send + Sync {
    /// `None` when the registry has no answer
    async fn latest_version(&self) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Major,
    Minor,
    Patch,
}

impl UpdateKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Major => "Major update available! Review breaking changes before upgrading.",
            Self::Minor => "New features available!",
            Self::Patch => "Bug fixes available.",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub current: String,
    pub latest: String,
    pub kind: Option<UpdateKind>,
}

impl VersionCheck {
    pub fn has_update(&self) -> bool {
        self.kind.is_some()
    }
}

fn parse(version: &str) -> Option<(u64, u64, u64)> {
    let core = version.trim().trim_start_matches('v');
    // pre-release and build metadata are ignored
    let core = core.split(['-', '+']).next()?;
    let mut parts = core.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    let patch = parts.next().unwrap_or(Some(0))?;
    Some((major, minor, patch))
}

/// How far `latest` is ahead of `current`
///
/// `None` when `latest` is not newer or either side does not parse.
pub fn compare_versions(current: &str, latest: &str) -> Option<UpdateKind> {
    let (c_major, c_minor, c_patch) = parse(current)?;
    let (l_major, l_minor, l_patch) = parse(latest)?;
    if (l_major, l_minor, l_patch) <= (c_major, c_minor, c_patch) {
        None
    } else if l_major > c_major {
        Some(UpdateKind::Major)
    } else if l_minor > c_minor {
        Some(UpdateKind::Minor)
    } else {
        Some(UpdateKind::Patch)
    }
}

/// Compare `current` against the source; lookup failures yield `None`
pub async fn check_core_update(
    source: &dyn LatestVersionSource,
    current: &str,
) -> Option<VersionCheck> {
    let latest = match source.latest_version().await {
        Ok(Some(latest)) => latest,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(error = %e, "core version lookup failed");
            return None;
        }
    };
    let kind = compare_versions(current, &latest);
    Some(VersionCheck {
        current: current.to_string(),
        latest,
        kind,
    })
}

/// Log an upgrade hint when a newer core is published
///
/// Returns the check result so callers can show it elsewhere.
pub async fn log_update_notice(source: Arc<dyn LatestVersionSource>) -> Option<VersionCheck> {
    let check = check_core_update(source.as_ref(), CORE_VERSION).await?;
    if let Some(kind) = check.kind {
        tracing::warn!(
            current = %check.current,
            latest = %check.latest,
            %kind,
            "deskkit-core update available. {} Run: cargo update -p deskkit-core",
            kind.message()
        );
    }
    Some(check)
}
