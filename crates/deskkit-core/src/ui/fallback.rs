//! Static screens shown while the app is not renderable
//!
//! None of these depend on translations or config, they must render even
//! when both failed to load.

use super::action::Action;
use super::node::{Element, Node};

/// Shown while the store is opening
pub fn loading_screen() -> Node {
    Element::new("div")
        .class("fallback")
        .attr("data-region", "loading")
        .child(Element::new("div").class("spinner"))
        .child(Element::new("p").child("Initializing..."))
        .into()
}

/// Shown when the store failed to open or migrate
pub fn database_error_screen(message: &str, detail: Option<&str>) -> Node {
    let mut el = Element::new("div")
        .class("fallback")
        .attr("data-region", "database-error")
        .child(Element::new("h2").child("Database Initialization Failed"))
        .child(Element::new("p").class("error-message").child(message));
    if let Some(detail) = detail {
        el = el.child(Element::new("pre").class("error-detail").child(detail));
    }
    el.into()
}

/// Generic startup failure screen
pub fn init_error_screen(title: &str, message: &str, detail: Option<&str>) -> Node {
    let mut el = Element::new("div")
        .class("fallback")
        .attr("data-region", "init-error")
        .child(Element::new("h2").child(title))
        .child(Element::new("p").class("error-message").child(message));
    if let Some(detail) = detail {
        el = el.child(Element::new("pre").class("error-detail").child(detail));
    }
    el.into()
}

/// Shown by the error boundary after a render failure
pub fn recovery_screen(message: Option<&str>, detail: Option<&str>) -> Node {
    let mut el = Element::new("div")
        .class("fallback")
        .attr("data-region", "recovery")
        .child(Element::new("h2").child("Something went wrong"))
        .child(
            Element::new("p")
                .class("error-message")
                .child(message.unwrap_or("An unexpected error occurred")),
        );
    if let Some(detail) = detail {
        el = el.child(Element::new("pre").class("error-detail").child(detail));
    }
    el.child(
        Element::new("div")
            .class("fallback-actions")
            .child(Element::new("button").on_click(Action::Reload).child("Reload"))
            .child(Element::new("button").on_click(Action::GoHome).child("Go Home")),
    )
    .into()
}
