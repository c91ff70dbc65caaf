//! Render context and override resolution

use std::cell::Cell;

use super::action::SettingsTab;
use super::component::{
    Component, LogoProps, NavItemProps, Override, ShellProps, TitleBarProps,
};
use super::node::{Element, Node};
use super::router::Router;
use super::settings::UpdateView;
use super::{nav, shell, title_bar};
use crate::config::Config;
use crate::i18n::I18n;
use crate::theme::ThemeMode;

/// Components that can be overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Shell,
    TitleBar,
    NavItem,
    Logo,
}

impl ComponentKind {
    fn bit(self) -> u8 {
        match self {
            Self::Shell => 1,
            Self::TitleBar => 1 << 1,
            Self::NavItem => 1 << 2,
            Self::Logo => 1 << 3,
        }
    }
}

/// Which renderer a region uses for this render
pub enum Renderer<'c, P> {
    BuiltIn,
    Custom(&'c dyn Component<P>),
}

impl<P> Renderer<'_, P> {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::BuiltIn)
    }
}

/// Host window and app state read by built-in components
#[derive(Debug, Clone, Default)]
pub struct ChromeState {
    pub theme_mode: ThemeMode,
    pub maximized: bool,
    pub settings_tab: SettingsTab,
    pub update: UpdateView,
}

/// Everything a component may read while rendering
pub struct RenderContext<'a> {
    config: &'a Config,
    i18n: &'a I18n,
    router: &'a dyn Router,
    chrome: ChromeState,
    delegating: Cell<u8>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config, i18n: &'a I18n, router: &'a dyn Router) -> Self {
        Self {
            config,
            i18n,
            router,
            chrome: ChromeState::default(),
            delegating: Cell::new(0),
        }
    }

    pub fn with_chrome(mut self, chrome: ChromeState) -> Self {
        self.chrome = chrome;
        self
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn i18n(&self) -> &'a I18n {
        self.i18n
    }

    pub fn router(&self) -> &'a dyn Router {
        self.router
    }

    pub fn chrome(&self) -> &ChromeState {
        &self.chrome
    }

    /// Translate a key with the active language
    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key)
    }

    /// Pick the renderer for `kind`
    ///
    /// A custom override wins unless it is a built-in renderer or the same
    /// component is already being delegated further up the stack.
    pub fn resolve<'c, P>(
        &self,
        kind: ComponentKind,
        registered: Option<&'c Override<P>>,
    ) -> Renderer<'c, P> {
        match registered {
            Some(o) if !o.is_builtin() && !self.is_delegating(kind) => {
                Renderer::Custom(o.component())
            }
            Some(_) if self.is_delegating(kind) => {
                tracing::debug!(?kind, "override re-entered itself, using built-in");
                Renderer::BuiltIn
            }
            _ => Renderer::BuiltIn,
        }
    }

    fn is_delegating(&self, kind: ComponentKind) -> bool {
        self.delegating.get() & kind.bit() != 0
    }

    fn delegate<P>(&self, kind: ComponentKind, component: &dyn Component<P>, props: &P) -> Node {
        let _guard = DelegationGuard::enter(&self.delegating, kind);
        component.render(self, props)
    }

    pub fn render_shell(&self, props: &ShellProps) -> Node {
        let registered = self.config.components.shell.as_ref();
        match self.resolve(ComponentKind::Shell, registered) {
            Renderer::Custom(c) => self.delegate(ComponentKind::Shell, c, props),
            Renderer::BuiltIn => shell::render_default(self, props),
        }
    }

    pub fn render_title_bar(&self, props: &TitleBarProps) -> Node {
        let registered = self.config.components.title_bar.as_ref();
        match self.resolve(ComponentKind::TitleBar, registered) {
            Renderer::Custom(c) => self.delegate(ComponentKind::TitleBar, c, props),
            Renderer::BuiltIn => title_bar::render_default(self, props),
        }
    }

    pub fn render_nav_item(&self, props: &NavItemProps) -> Node {
        let registered = self.config.components.nav_item.as_ref();
        match self.resolve(ComponentKind::NavItem, registered) {
            Renderer::Custom(c) => self.delegate(ComponentKind::NavItem, c, props),
            Renderer::BuiltIn => nav::render_default(self, props),
        }
    }

    pub fn render_logo(&self, props: &LogoProps) -> Node {
        let registered = self.config.brand.logo.as_ref();
        match self.resolve(ComponentKind::Logo, registered) {
            Renderer::Custom(c) => self.delegate(ComponentKind::Logo, c, props),
            Renderer::BuiltIn => title_bar::render_logo(self, props),
        }
    }

    /// Single-occupancy region: the slot replaces the default content
    pub fn replace_slot(&self, slot: Option<&Node>, default: impl FnOnce() -> Node) -> Node {
        match slot {
            Some(node) => node.clone(),
            None => default(),
        }
    }

    /// Compound region: slots render next to the default content
    pub fn surround(&self, before: Option<&Node>, content: Node, after: Option<&Node>) -> Node {
        Node::fragment([
            before.cloned().unwrap_or_default(),
            content,
            after.cloned().unwrap_or_default(),
        ])
    }

    /// Wrap a slot fragment so hosts can find it
    pub(crate) fn slot_wrapper(&self, name: &str, slot: Option<&Node>) -> Node {
        match slot {
            Some(node) => Element::new("div")
                .attr("data-slot", name)
                .child(node.clone())
                .into(),
            None => Node::Empty,
        }
    }
}

struct DelegationGuard<'c> {
    cell: &'c Cell<u8>,
    previous: u8,
}

impl<'c> DelegationGuard<'c> {
    fn enter(cell: &'c Cell<u8>, kind: ComponentKind) -> Self {
        let previous = cell.get();
        cell.set(previous | kind.bit());
        Self { cell, previous }
    }
}

impl Drop for DelegationGuard<'_> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}
