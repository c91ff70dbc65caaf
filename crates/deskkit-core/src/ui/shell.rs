//! Application shell: title bar, sidebar and main content area

use super::action::Action;
use super::component::{ShellProps, TitleBarProps};
use super::context::RenderContext;
use super::nav::{icon, render_nav};
use super::node::{Element, Node};
use crate::config::SidebarPosition;

pub const SETTINGS_PATH: &str = "/settings";

pub fn render_default(cx: &RenderContext<'_>, props: &ShellProps) -> Node {
    let config = cx.config();
    let sidebar_layout = &config.layout.sidebar;
    let slots = &config.slots;
    let right = sidebar_layout.position == SidebarPosition::Right;

    let mut sidebar = Element::new("aside")
        .class("sidebar")
        .class(if right { "border-l" } else { "border-r" })
        .attr("data-region", "sidebar")
        .attr("data-position", sidebar_layout.position.as_str())
        .style("width", format!("{}px", sidebar_layout.width));
    if sidebar_layout.collapsible {
        sidebar = sidebar.attr("data-collapsible", "true").attr(
            "data-collapsed",
            sidebar_layout.default_collapsed.to_string(),
        );
    }

    let header = match slots.sidebar.header.as_ref() {
        Some(slot) => Element::new("div")
            .class("sidebar-header")
            .attr("data-region", "sidebar.header")
            .child(slot.clone())
            .into(),
        None => Node::Empty,
    };

    let scroll = Element::new("div").class("sidebar-scroll").children([
        cx.slot_wrapper("sidebar.before_nav", slots.sidebar.before_nav.as_ref()),
        render_nav(cx),
        cx.slot_wrapper("sidebar.after_nav", slots.sidebar.after_nav.as_ref()),
    ]);

    let footer = Element::new("div")
        .class("sidebar-footer")
        .attr("data-region", "sidebar.footer")
        .child(cx.replace_slot(slots.sidebar.footer.as_ref(), || default_footer(cx)));

    let sidebar = sidebar.child(header).child(scroll).child(footer);

    let content = if props.no_outlet {
        props.children.clone().unwrap_or_default()
    } else {
        Node::fragment([
            cx.router().outlet(cx),
            props.children.clone().unwrap_or_default(),
        ])
    };

    let content_layout = &config.layout.content;
    let mut main = Element::new("main")
        .class("content")
        .attr("data-region", "content")
        .style("padding", format!("{}px", content_layout.padding));
    if content_layout.max_width > 0 {
        main = main.style("max-width", format!("{}px", content_layout.max_width));
    }
    let main = main.child(cx.surround(
        slots.shell.before_content.as_ref(),
        content,
        slots.shell.after_content.as_ref(),
    ));

    let body = Element::new("div")
        .class("shell-body")
        .class_if(right, "row-reverse")
        .child(sidebar)
        .child(main);

    Element::new("div")
        .class("shell")
        .class(props.class_name.as_deref().unwrap_or_default())
        .attr("data-region", "shell")
        .child(cx.render_title_bar(&TitleBarProps::default()))
        .child(body)
        .into()
}

/// User menu and settings button
fn default_footer(cx: &RenderContext<'_>) -> Node {
    let menu_item = |key: &str| {
        Element::new("option")
            .on_click(Action::Custom(key.to_string()))
            .child(cx.t(key))
    };
    let user_menu = Element::new("menu")
        .class("user-menu")
        .child(icon("user"))
        .child(Element::new("span").class("user-name").child(cx.t("common.user")))
        .child(Element::new("label").child(cx.t("common.menu.account")))
        .child(menu_item("common.menu.profile"))
        .child(menu_item("common.menu.billing"))
        .child(menu_item("common.menu.logout"));

    let settings = Element::new("button")
        .class("settings-button")
        .attr("title", cx.t("settings.title"))
        .on_click(Action::Navigate(SETTINGS_PATH.to_string()))
        .child(icon("settings"));

    Element::new("div")
        .class("sidebar-footer-default")
        .child(user_menu)
        .child(settings)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ComponentOverrides, Config, PartialConfig, PartialLayout, PartialSidebar, PartialSlots,
        ShellSlots, SidebarSlots, merge,
    };
    use crate::i18n::{I18n, I18nConfig};
    use crate::ui::component::{BuiltinShell, Override};
    use crate::ui::router::{MemoryRouter, Router};

    fn i18n() -> I18n {
        I18n::bootstrap(&I18nConfig {
            default_language: Some("en".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_layout() {
        let config = Config::default();
        let i18n = i18n();
        let router = MemoryRouter::new("/").route("/", |_cx: &RenderContext<'_>| Node::text("home page"));
        let cx = RenderContext::new(&config, &i18n, &router);

        let node = cx.render_shell(&ShellProps::default());
        let sidebar = node.region("sidebar").unwrap();
        assert_eq!(sidebar.style.get("width").map(String::as_str), Some("180px"));
        assert_eq!(sidebar.attr_value("data-position"), Some("left"));
        assert!(node.region("sidebar.header").is_none());
        assert_eq!(node.region("content").unwrap().text_content(), "home page");

        let settings = node.find(&|el| el.has_class("settings-button")).unwrap();
        assert_eq!(settings.on_click, Some(Action::Navigate("/settings".into())));
    }

    #[test]
    fn test_right_sidebar_and_footer_slot() {
        let config = merge(
            Config::default(),
            PartialConfig {
                layout: Some(PartialLayout {
                    sidebar: Some(PartialSidebar {
                        position: Some(SidebarPosition::Right),
                        width: Some(0),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                slots: Some(PartialSlots {
                    sidebar: Some(SidebarSlots {
                        footer: Some(Node::text("my footer")),
                        before_nav: Some(Node::text("before")),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let i18n = i18n();
        let router = MemoryRouter::new("/");
        let cx = RenderContext::new(&config, &i18n, &router);

        let node = cx.render_shell(&ShellProps::default());
        let body = node.find(&|el| el.has_class("shell-body")).unwrap();
        assert!(body.has_class("row-reverse"));
        let sidebar = node.region("sidebar").unwrap();
        assert_eq!(sidebar.style.get("width").map(String::as_str), Some("0px"));
        assert_eq!(node.region("sidebar.footer").unwrap().text_content(), "my footer");
        assert!(node.find(&|el| el.has_class("settings-button")).is_none());
        // compound slot sits next to the nav, not instead of it
        assert!(node.find(&|el| el.attr_value("data-slot") == Some("sidebar.before_nav")).is_some());
        assert!(node.region("nav").is_some());
    }

    #[test]
    fn test_no_outlet_renders_children_only() {
        let config = merge(
            Config::default(),
            PartialConfig {
                slots: Some(PartialSlots {
                    shell: Some(ShellSlots {
                        before_content: Some(Node::text("banner")),
                        after_content: None,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let i18n = i18n();
        let router = MemoryRouter::new("/").route("/", |_cx: &RenderContext<'_>| Node::text("routed"));
        let cx = RenderContext::new(&config, &i18n, &router);

        let props = ShellProps {
            children: Some(Node::text("child")),
            no_outlet: true,
            ..Default::default()
        };
        let node = cx.render_shell(&props);
        assert_eq!(node.region("content").unwrap().text_content(), "banner child");

        let props = ShellProps {
            children: Some(Node::text("child")),
            ..Default::default()
        };
        let node = cx.render_shell(&props);
        assert_eq!(node.region("content").unwrap().text_content(), "banner routed child");
    }

    #[test]
    fn test_shell_override_and_builtin_override() {
        let custom = merge(
            Config::default(),
            PartialConfig {
                components: Some(ComponentOverrides {
                    shell: Some(Override::from_fn(|_cx: &RenderContext<'_>, props: &ShellProps| {
                        Element::new("div")
                            .attr("data-region", "custom-shell")
                            .child(props.children.clone().unwrap_or_default())
                            .into()
                    })),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let i18n = i18n();
        let router = MemoryRouter::new("/");
        let cx = RenderContext::new(&custom, &i18n, &router);
        let node = cx.render_shell(&ShellProps {
            children: Some(Node::text("passed through")),
            ..Default::default()
        });
        assert_eq!(node.region("custom-shell").unwrap().text_content(), "passed through");
        assert!(node.region("sidebar").is_none());

        let builtin = merge(
            Config::default(),
            PartialConfig {
                components: Some(ComponentOverrides {
                    shell: Some(Override::new(BuiltinShell)),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let cx = RenderContext::new(&builtin, &i18n, &router);
        let node = cx.render_shell(&ShellProps::default());
        assert!(node.region("sidebar").is_some());
        assert_eq!(router.current_path(), "/");
    }
}
