//! Routed pages

use deskkit_core::ui::{Element, MemoryRouter, Node, RenderContext, SettingsPageProps, render_settings_page};

pub fn router() -> MemoryRouter {
    MemoryRouter::new("/")
        .route("/", home)
        .route("/settings", |cx: &RenderContext<'_>| {
            render_settings_page(cx, &SettingsPageProps::default())
        })
}

fn home(cx: &RenderContext<'_>) -> Node {
    Element::new("section")
        .class("home")
        .child(Element::new("h1").child(cx.t("home.welcome")))
        .into()
}
