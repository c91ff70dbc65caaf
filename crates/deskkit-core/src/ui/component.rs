//! Component overrides and their props contracts

use std::fmt;
use std::sync::Arc;

use super::action::Action;
use super::context::RenderContext;
use super::node::Node;
use crate::config::NavItem;

/// A renderable component taking props `P`
pub trait Component<P>: Send + Sync {
    fn render(&self, cx: &RenderContext<'_>, props: &P) -> Node;

    /// True for the library's own renderers. Registering one of these as an
    /// override is the same as registering nothing.
    fn is_builtin(&self) -> bool {
        false
    }
}

/// Adapts a closure into a [`Component`]
pub struct FnComponent<F>(F);

impl<P, F> Component<P> for FnComponent<F>
where
    F: Fn(&RenderContext<'_>, &P) -> Node + Send + Sync,
{
    fn render(&self, cx: &RenderContext<'_>, props: &P) -> Node {
        (self.0)(cx, props)
    }
}

/// A caller-registered replacement for a built-in component
pub struct Override<P>(Arc<dyn Component<P>>);

impl<P: 'static> Override<P> {
    pub fn new(component: impl Component<P> + 'static) -> Self {
        Self(Arc::new(component))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RenderContext<'_>, &P) -> Node + Send + Sync + 'static,
    {
        Self(Arc::new(FnComponent(f)))
    }
}

impl<P> Override<P> {
    pub fn component(&self) -> &dyn Component<P> {
        self.0.as_ref()
    }

    pub fn is_builtin(&self) -> bool {
        self.0.is_builtin()
    }
}

impl<P> Clone for Override<P> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P> fmt::Debug for Override<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Override")
            .field("builtin", &self.is_builtin())
            .finish()
    }
}

/// Props for the application shell
#[derive(Debug, Clone, Default)]
pub struct ShellProps {
    /// Extra content for the main area
    pub children: Option<Node>,
    pub class_name: Option<String>,
    /// Render `children` only, without the router outlet
    pub no_outlet: bool,
}

/// Props for the title bar
#[derive(Debug, Clone)]
pub struct TitleBarProps {
    pub class_name: Option<String>,
    /// Whether the window has focus. Unfocused title bars render dimmed.
    pub focused: bool,
}

impl Default for TitleBarProps {
    fn default() -> Self {
        Self {
            class_name: None,
            focused: true,
        }
    }
}

/// Props for a single navigation row
#[derive(Debug, Clone, PartialEq)]
pub struct NavItemProps {
    pub item: NavItem,
    pub is_active: bool,
    pub on_click: Action,
}

/// Props for the brand logo
#[derive(Debug, Clone, Default)]
pub struct LogoProps {
    pub class_name: Option<String>,
}

/// Built-in shell renderer as a registrable component
pub struct BuiltinShell;

impl Component<ShellProps> for BuiltinShell {
    fn render(&self, cx: &RenderContext<'_>, props: &ShellProps) -> Node {
        super::shell::render_default(cx, props)
    }

    fn is_builtin(&self) -> bool {
        true
    }
}

/// Built-in title bar renderer as a registrable component
pub struct BuiltinTitleBar;

impl Component<TitleBarProps> for BuiltinTitleBar {
    fn render(&self, cx: &RenderContext<'_>, props: &TitleBarProps) -> Node {
        super::title_bar::render_default(cx, props)
    }

    fn is_builtin(&self) -> bool {
        true
    }
}

/// Built-in nav row renderer as a registrable component
pub struct BuiltinNavItem;

impl Component<NavItemProps> for BuiltinNavItem {
    fn render(&self, cx: &RenderContext<'_>, props: &NavItemProps) -> Node {
        super::nav::render_default(cx, props)
    }

    fn is_builtin(&self) -> bool {
        true
    }
}

/// Built-in logo renderer as a registrable component
pub struct BuiltinLogo;

impl Component<LogoProps> for BuiltinLogo {
    fn render(&self, cx: &RenderContext<'_>, props: &LogoProps) -> Node {
        super::title_bar::render_logo(cx, props)
    }

    fn is_builtin(&self) -> bool {
        true
    }
}
