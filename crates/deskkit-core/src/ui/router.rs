//! Routing collaborator
//!
//! The shell only asks three things of a router: where are we, is this path
//! active, and please go there. [`MemoryRouter`] is the in-process
//! implementation used by the playground and tests.

use std::cell::RefCell;
use std::sync::Arc;

use super::context::RenderContext;
use super::node::Node;

/// A routed page renderer
pub type Page = Arc<dyn Fn(&RenderContext<'_>) -> Node + Send + Sync>;

/// Routing collaborator
pub trait Router {
    /// Current location path
    fn current_path(&self) -> String;

    /// Whether `path` should be highlighted as the active nav entry
    fn is_active(&self, path: &str) -> bool {
        path_matches(&self.current_path(), path)
    }

    /// Request a route change
    fn navigate(&self, path: &str);

    /// Content for the current route
    fn outlet(&self, _cx: &RenderContext<'_>) -> Node {
        Node::Empty
    }
}

/// Exact or segment-prefix match: `/settings` is active on
/// `/settings/about` but not on `/settingsx`. `/` only matches itself.
pub fn path_matches(current: &str, target: &str) -> bool {
    let current = normalize(current);
    let target = normalize(target);
    if target == "/" {
        return current == "/";
    }
    current == target
        || current
            .strip_prefix(target)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// In-memory router with a history stack
pub struct MemoryRouter {
    history: RefCell<Vec<String>>,
    routes: Vec<(String, Page)>,
}

impl MemoryRouter {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: RefCell::new(vec![initial.into()]),
            routes: Vec::new(),
        }
    }

    /// Register a page for an exact path
    pub fn route<F>(mut self, path: impl Into<String>, page: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> Node + Send + Sync + 'static,
    {
        self.routes.push((path.into(), Arc::new(page)));
        self
    }

    /// Pop one history entry. Returns false at the root.
    pub fn back(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.len() > 1 {
            history.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.history.borrow().len()
    }

    fn page_for(&self, path: &str) -> Option<&Page> {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|(route, _)| normalize(route) == path)
            .map(|(_, page)| page)
    }
}

impl Router for MemoryRouter {
    fn current_path(&self) -> String {
        self.history.borrow().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, path: &str) {
        let mut history = self.history.borrow_mut();
        if history.last().map(String::as_str) != Some(path) {
            history.push(path.to_string());
        }
    }

    fn outlet(&self, cx: &RenderContext<'_>) -> Node {
        match self.page_for(&self.current_path()) {
            Some(page) => page(cx),
            None => Node::Empty,
        }
    }
}
