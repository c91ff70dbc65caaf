//! Check-and-ask convenience flow

use async_trait::async_trait;

use super::{UpdateError, UpdateInfo, UpdateProgress, Updater};

/// Yes/no confirmation shown by the host
#[async_trait]
pub trait Dialog: Send + Sync {
    async fn ask(&self, title: &str, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptOptions {
    /// Never ask to download; only report what the check found
    pub silent: bool,
    /// Download without asking, then ask to relaunch
    pub auto_download: bool,
}

/// Check for an update and walk the user through installing it
///
/// Returns the check result whether or not the user accepted.
pub async fn check_and_prompt<F>(
    updater: &mut Updater,
    dialog: &dyn Dialog,
    options: PromptOptions,
    on_progress: F,
) -> Result<UpdateInfo, UpdateError>
where
    F: FnMut(&UpdateProgress) + Send,
{
    let info = updater.check().await?;
    if !info.available {
        return Ok(info);
    }
    let version = info.version.as_deref().unwrap_or_default();

    if options.auto_download {
        updater.download(on_progress).await?;
        let message = format!("Update {} has been downloaded. Restart now?", version);
        if dialog.ask("Update Ready", &message).await {
            updater.install().await?;
        }
    } else if !options.silent {
        let notes = info.body.as_deref().unwrap_or("Would you like to update now?");
        let message = format!("A new version ({}) is available.\n\n{}", version, notes);
        if dialog.ask("Update Available", &message).await {
            updater.download(on_progress).await?;
            if dialog
                .ask("Update Ready", "Update downloaded. Restart now to apply?")
                .await
            {
                updater.install().await?;
            }
        } else {
            tracing::debug!(version, "update declined");
        }
    }

    Ok(info)
}
