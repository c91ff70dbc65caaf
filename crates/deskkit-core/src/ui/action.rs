//! User intents emitted by rendered elements

use serde::{Deserialize, Serialize};

use super::router::Router;
use crate::theme::ThemeMode;

/// Settings page tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsTab {
    #[default]
    General,
    About,
}

impl SettingsTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::About => "about",
        }
    }
}

/// An intent attached to an element's click or double-click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Change the active route
    Navigate(String),
    Minimize,
    ToggleMaximize,
    CloseWindow,
    /// Re-render after the error boundary tripped
    Reload,
    /// Reset the error boundary and go to `/`
    GoHome,
    CheckForUpdates,
    DownloadUpdate,
    InstallUpdate,
    ChangeLanguage(String),
    SetThemeMode(ThemeMode),
    SelectSettingsTab(SettingsTab),
    /// Application-defined action carried through untouched
    Custom(String),
}

impl Action {
    /// Whether the action targets the native window
    pub fn is_window_action(&self) -> bool {
        matches!(self, Self::Minimize | Self::ToggleMaximize | Self::CloseWindow)
    }
}

/// Outcome of [`dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The router accepted the route change
    Navigated(String),
    /// Not a UI-layer action; the host handles it
    Unhandled(Action),
}

/// Route UI-layer actions
///
/// Only navigation is handled here. Every other action is returned to the
/// host untouched.
pub fn dispatch(action: Action, router: &dyn Router) -> Dispatched {
    match action {
        Action::Navigate(path) => {
            tracing::debug!(path = %path, "navigate");
            router.navigate(&path);
            Dispatched::Navigated(path)
        }
        other => Dispatched::Unhandled(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::router::MemoryRouter;

    #[test]
    fn test_dispatch_navigates() {
        let router = MemoryRouter::new("/");
        let result = dispatch(Action::Navigate("/settings".into()), &router);
        assert_eq!(result, Dispatched::Navigated("/settings".into()));
        assert_eq!(router.current_path(), "/settings");
    }

    #[test]
    fn test_dispatch_leaves_other_actions() {
        let router = MemoryRouter::new("/");
        let result = dispatch(Action::ToggleMaximize, &router);
        assert_eq!(result, Dispatched::Unhandled(Action::ToggleMaximize));
        assert_eq!(router.current_path(), "/");
    }

    #[test]
    fn test_action_serde_shape() {
        let json = serde_json::to_string(&Action::Navigate("/a".into())).unwrap();
        assert_eq!(json, r#"{"type":"navigate","payload":"/a"}"#);
        let back: Action = serde_json::from_str(r#"{"type":"minimize"}"#).unwrap();
        assert_eq!(back, Action::Minimize);
    }
}
