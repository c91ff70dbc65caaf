//! Sidebar navigation rows

use super::action::Action;
use super::component::NavItemProps;
use super::context::RenderContext;
use super::node::{Element, Node};
use crate::config::{Badge, NavItem};

/// Built-in row content: icon, translated title and a badge when truthy
pub fn render_default(cx: &RenderContext<'_>, props: &NavItemProps) -> Node {
    let item = &props.item;
    Element::new("span")
        .class("nav-item")
        .class_if(props.is_active, "active")
        .child(icon(&item.icon))
        .child(Element::new("span").class("nav-title").child(cx.t(&item.title)))
        .child(badge(item.badge.as_ref()))
        .into()
}

/// Render every configured entry inside the `nav` region
pub fn render_nav(cx: &RenderContext<'_>) -> Node {
    let router = cx.router();
    let rows = cx.config().nav.iter().map(|item| {
        let is_active = router.is_active(&item.path);
        render_link(cx, item, is_active)
    });
    Element::new("nav")
        .attr("data-region", "nav")
        .class("nav")
        .children(rows)
        .into()
}

fn render_link(cx: &RenderContext<'_>, item: &NavItem, is_active: bool) -> Node {
    let on_click = Action::Navigate(item.path.clone());
    let props = NavItemProps {
        item: item.clone(),
        is_active,
        on_click: on_click.clone(),
    };
    let mut link = Element::new("a")
        .class("nav-link")
        .class_if(is_active, "active")
        .attr("data-path", &item.path)
        .on_click(on_click);
    if is_active {
        link = link.attr("aria-current", "page");
    }
    link.child(cx.render_nav_item(&props)).into()
}

pub(crate) fn icon(name: &str) -> Node {
    if name.is_empty() {
        return Node::Empty;
    }
    Element::new("icon").attr("name", name).into()
}

fn badge(badge: Option<&Badge>) -> Node {
    match badge {
        Some(b) if b.is_truthy() => Element::new("span")
            .class("badge")
            .child(b.to_string())
            .into(),
        _ => Node::Empty,
    }
}
