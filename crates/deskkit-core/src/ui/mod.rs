//! UI composition layer
//!
//! Built-in shell components render into a backend-neutral [`Node`] tree.
//! For every region the [`RenderContext`] picks, in order: a registered
//! component override, the slot for that region, the built-in default.

pub mod action;
pub mod boundary;
pub mod component;
pub mod context;
pub mod fallback;
pub mod nav;
pub mod node;
pub mod router;
pub mod settings;
pub mod shell;
pub mod title_bar;

pub use action::{Action, Dispatched, SettingsTab, dispatch};
pub use boundary::{BoundaryState, CapturedError, ErrorBoundary};
pub use component::{
    BuiltinLogo, BuiltinNavItem, BuiltinShell, BuiltinTitleBar, Component, LogoProps,
    NavItemProps, Override, ShellProps, TitleBarProps,
};
pub use context::{ChromeState, ComponentKind, RenderContext, Renderer};
pub use node::{Element, Node};
pub use router::{MemoryRouter, Page, Router, path_matches};
pub use settings::{SettingsPageProps, UpdateView, render_settings_page};
pub use shell::SETTINGS_PATH;
