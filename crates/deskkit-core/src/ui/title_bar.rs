//! Title bar, window controls and the header switchers

use super::action::Action;
use super::component::{LogoProps, TitleBarProps};
use super::context::RenderContext;
use super::nav::icon;
use super::node::{Element, Node};
use crate::i18n::language_label;
use crate::theme::ThemeMode;

pub fn render_default(cx: &RenderContext<'_>, props: &TitleBarProps) -> Node {
    let config = cx.config();
    let layout = &config.layout.title_bar;
    let slots = &config.slots.title_bar;

    let left = Element::new("div")
        .class("title-bar-left")
        .attr("data-region", "title-bar.left")
        .child(cx.replace_slot(slots.left.as_ref(), || {
            Node::fragment([
                cx.render_logo(&LogoProps {
                    class_name: Some("logo-sm".to_string()),
                }),
                Element::new("span")
                    .class("brand-name")
                    .child(cx.t(&config.brand.name))
                    .into(),
            ])
        }));

    let center = match slots.center.as_ref() {
        Some(slot) => Element::new("div")
            .class("title-bar-center")
            .attr("data-region", "title-bar.center")
            .child(slot.clone())
            .into(),
        None => Node::Empty,
    };

    let mut right = Element::new("div")
        .class("title-bar-right")
        .attr("data-region", "title-bar.right")
        .child(cx.replace_slot(slots.right.as_ref(), || {
            Node::fragment([language_switcher(cx), theme_switcher(cx)])
        }));
    if layout.show_window_controls {
        right = right
            .child(Element::new("div").class("separator"))
            .child(window_controls(cx.chrome().maximized));
    }

    let mut header = Element::new("header")
        .class("title-bar")
        .class_if(!props.focused, "unfocused")
        .class(props.class_name.as_deref().unwrap_or_default())
        .attr("data-region", "title-bar")
        .style("height", format!("{}px", layout.height));
    if layout.draggable {
        header = header
            .attr("data-drag-region", "true")
            .on_double_click(Action::ToggleMaximize);
    }

    header.child(left).child(center).child(right).into()
}

/// Built-in logo mark
pub fn render_logo(_cx: &RenderContext<'_>, props: &LogoProps) -> Node {
    Element::new("icon")
        .class("logo")
        .class(props.class_name.as_deref().unwrap_or_default())
        .attr("name", "logo")
        .into()
}

/// Minimize, maximize/restore and close buttons
pub fn window_controls(maximized: bool) -> Node {
    Element::new("div")
        .class("window-controls")
        .attr("data-region", "window-controls")
        .child(
            Element::new("button")
                .attr("title", "minimize")
                .on_click(Action::Minimize)
                .child(icon("minus")),
        )
        .child(
            Element::new("button")
                .attr("title", if maximized { "restore" } else { "maximize" })
                .on_click(Action::ToggleMaximize)
                .child(icon(if maximized { "square" } else { "maximize-2" })),
        )
        .child(
            Element::new("button")
                .class("close")
                .attr("title", "close")
                .on_click(Action::CloseWindow)
                .child(icon("x")),
        )
        .into()
}

/// Dropdown with one entry per supported language
pub fn language_switcher(cx: &RenderContext<'_>) -> Node {
    let current = cx.i18n().language();
    let options = cx.i18n().supported_languages().into_iter().map(|code| {
        Element::new("option")
            .class_if(current.starts_with(code.as_str()), "selected")
            .attr("value", &code)
            .on_click(Action::ChangeLanguage(code.clone()))
            .child(language_label(&code))
    });
    Element::new("menu")
        .class("language-switcher")
        .attr("title", cx.t("common.language"))
        .child(icon("languages"))
        .children(options)
        .into()
}

/// Dropdown with light, dark and system modes
pub fn theme_switcher(cx: &RenderContext<'_>) -> Node {
    let current = cx.chrome().theme_mode;
    let options = ThemeMode::ALL.into_iter().map(|mode| {
        Element::new("option")
            .class_if(mode == current, "selected")
            .attr("value", mode.as_str())
            .on_click(Action::SetThemeMode(mode))
            .child(cx.t(mode.label_key()))
    });
    Element::new("menu")
        .class("theme-switcher")
        .attr("title", cx.t("common.theme"))
        .child(icon(current.icon()))
        .children(options)
        .into()
}
