//! Settings page with general and about tabs

use super::action::{Action, SettingsTab};
use super::component::LogoProps;
use super::context::RenderContext;
use super::nav::icon;
use super::node::{Element, Node};
use super::title_bar::{language_switcher, theme_switcher};
use crate::updater::{UpdateStatus, Updater};

/// Snapshot of the updater used to draw the update control
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateView {
    pub enabled: bool,
    pub status: UpdateStatus,
    pub version: Option<String>,
    pub percent: u8,
    pub error: Option<String>,
}

impl UpdateView {
    pub fn from_updater(updater: &Updater) -> Self {
        Self {
            enabled: updater.is_enabled(),
            status: updater.status(),
            version: updater.info().and_then(|info| info.version.clone()),
            percent: updater.progress().map(|p| p.percent).unwrap_or(0),
            error: updater.error().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPageProps {
    /// Replaces the default about-tab footer
    pub footer: Option<Node>,
}

pub fn render_settings_page(cx: &RenderContext<'_>, props: &SettingsPageProps) -> Node {
    let active = cx.chrome().settings_tab;

    let header = Element::new("header")
        .class("page-header")
        .child(Element::new("h1").child(cx.t("settings.title")))
        .child(Element::new("p").child(cx.t("settings.description")));

    let tab = |tab: SettingsTab, icon_name: &str| {
        Element::new("button")
            .class("settings-tab")
            .class_if(tab == active, "active")
            .attr("data-tab", tab.as_str())
            .on_click(Action::SelectSettingsTab(tab))
            .child(icon(icon_name))
            .child(cx.t(&format!("settings.tabs.{}", tab.as_str())))
    };
    let tabs = Element::new("aside")
        .class("settings-tabs")
        .child(tab(SettingsTab::General, "settings"))
        .child(tab(SettingsTab::About, "info"));

    let body = match active {
        SettingsTab::General => general_tab(cx),
        SettingsTab::About => about_tab(cx, props),
    };

    Element::new("div")
        .class("settings-page")
        .attr("data-region", "settings")
        .child(header)
        .child(
            Element::new("div")
                .class("settings-body")
                .child(tabs)
                .child(Element::new("div").class("settings-panel").child(body)),
        )
        .into()
}

fn general_tab(cx: &RenderContext<'_>) -> Node {
    let row = |label_key: &str, control: Node| {
        Element::new("div")
            .class("settings-row")
            .child(Element::new("label").child(cx.t(label_key)))
            .child(control)
    };
    Element::new("section")
        .attr("data-tab-panel", "general")
        .child(Element::new("h3").child(cx.t("settings.appearance")))
        .child(row("settings.language_select", language_switcher(cx)))
        .child(row("settings.theme_select", theme_switcher(cx)))
        .into()
}

fn about_tab(cx: &RenderContext<'_>, props: &SettingsPageProps) -> Node {
    let brand = &cx.config().brand;
    let version = Element::new("p")
        .class("version")
        .child(format!("{}:", cx.t("settings.about.current_version")))
        .child(
            Element::new("span")
                .class("mono")
                .child(brand.version.clone().unwrap_or_default()),
        );

    let footer = props.footer.clone().unwrap_or_else(|| {
        Element::new("div")
            .class("settings-footer")
            .child(Element::new("p").child(cx.t("settings.about.footer_line1")))
            .child(Element::new("p").child(cx.t("settings.about.footer_line2")))
            .into()
    });

    Element::new("section")
        .attr("data-tab-panel", "about")
        .child(cx.render_logo(&LogoProps {
            class_name: Some("logo-lg".to_string()),
        }))
        .child(Element::new("h2").child(cx.t(&brand.name)))
        .child(version)
        .child(update_control(cx, &cx.chrome().update))
        .child(footer)
        .into()
}

/// The update button block for the current status
pub fn update_control(cx: &RenderContext<'_>, view: &UpdateView) -> Node {
    let control = Element::new("div")
        .attr("data-region", "update-control")
        .attr("data-status", view.status.as_str());

    if !view.enabled {
        return control
            .child(disabled_button(cx.t("settings.about.updater_disabled")))
            .into();
    }

    let control = match view.status {
        UpdateStatus::Checking => control.child(
            disabled_button(cx.t("settings.about.checking")).child(icon("refresh-cw")),
        ),
        UpdateStatus::Available => control
            .child(Element::new("div").class("update-version").child(format!(
                "{}: {}",
                cx.t("settings.about.new_version"),
                view.version.as_deref().unwrap_or_default()
            )))
            .child(button(
                cx.t("settings.about.download_update"),
                Action::DownloadUpdate,
            )),
        UpdateStatus::Downloading => control
            .child(disabled_button(format!("{}%", view.percent)))
            .child(
                Element::new("progress")
                    .attr("value", view.percent.to_string())
                    .attr("max", "100")
                    .style("width", format!("{}%", view.percent)),
            ),
        UpdateStatus::Ready => control
            .child(
                Element::new("div")
                    .class("update-ready")
                    .child(icon("check-circle"))
                    .child(cx.t("settings.about.ready_to_install")),
            )
            .child(button(cx.t("settings.about.restart_now"), Action::InstallUpdate)),
        UpdateStatus::UpToDate => control
            .child(
                Element::new("div")
                    .class("update-current")
                    .child(icon("check-circle"))
                    .child(cx.t("settings.about.up_to_date")),
            )
            .child(button(
                cx.t("settings.about.check_updates"),
                Action::CheckForUpdates,
            )),
        UpdateStatus::CheckError | UpdateStatus::DownloadError => {
            let (fallback_key, retry) = if view.status == UpdateStatus::CheckError {
                ("settings.about.check_error", Action::CheckForUpdates)
            } else {
                ("settings.about.download_error", Action::DownloadUpdate)
            };
            let message = view.error.clone().unwrap_or_else(|| cx.t(fallback_key));
            control
                .child(
                    Element::new("div")
                        .class("update-error")
                        .child(icon("alert-circle"))
                        .child(message),
                )
                .child(button(cx.t("settings.about.retry"), retry))
        }
        UpdateStatus::Idle => control.child(button(
            cx.t("settings.about.check_updates"),
            Action::CheckForUpdates,
        )),
    };
    control.into()
}

fn button(label: String, action: Action) -> Element {
    Element::new("button").on_click(action).child(label)
}

fn disabled_button(label: String) -> Element {
    Element::new("button").attr("disabled", "true").child(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::i18n::{I18n, I18nConfig};
    use crate::ui::context::ChromeState;
    use crate::ui::router::MemoryRouter;

    fn render(view: UpdateView, tab: SettingsTab) -> Node {
        let config = Config::default();
        let i18n = I18n::bootstrap(&I18nConfig {
            default_language: Some("en".into()),
            ..Default::default()
        })
        .unwrap();
        let router = MemoryRouter::new("/settings");
        let cx = RenderContext::new(&config, &i18n, &router).with_chrome(ChromeState {
            settings_tab: tab,
            update: view,
            ..Default::default()
        });
        render_settings_page(&cx, &SettingsPageProps::default())
    }

    fn enabled(status: UpdateStatus) -> UpdateView {
        UpdateView {
            enabled: true,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_general_tab_by_default() {
        let node = render(UpdateView::default(), SettingsTab::General);
        assert!(node.find(&|el| el.attr_value("data-tab-panel") == Some("general")).is_some());
        assert!(node.region("update-control").is_none());
    }

    #[test]
    fn test_disabled_updater() {
        let node = render(UpdateView::default(), SettingsTab::About);
        let control = node.region("update-control").unwrap();
        assert_eq!(control.text_content(), "Updater is disabled");
        assert!(node.find(&|el| el.on_click == Some(Action::CheckForUpdates)).is_none());
    }

    #[test]
    fn test_available_offers_download() {
        let mut view = enabled(UpdateStatus::Available);
        view.version = Some("1.2.0".into());
        let node = render(view, SettingsTab::About);
        let control = node.region("update-control").unwrap();
        assert!(control.text_content().contains("New version available: 1.2.0"));
        assert!(control.find(&|el| el.on_click == Some(Action::DownloadUpdate)).is_some());
    }

    #[test]
    fn test_downloading_shows_percent() {
        let mut view = enabled(UpdateStatus::Downloading);
        view.percent = 42;
        let node = render(view, SettingsTab::About);
        assert!(node.region("update-control").unwrap().text_content().contains("42%"));
    }

    #[test]
    fn test_retry_reruns_failed_step() {
        let node = render(enabled(UpdateStatus::CheckError), SettingsTab::About);
        let control = node.region("update-control").unwrap();
        assert!(control.text_content().contains("Update check failed"));
        assert!(control.find(&|el| el.on_click == Some(Action::CheckForUpdates)).is_some());

        let mut view = enabled(UpdateStatus::DownloadError);
        view.error = Some("disk full".into());
        let node = render(view, SettingsTab::About);
        let control = node.region("update-control").unwrap();
        assert!(control.text_content().contains("disk full"));
        assert!(control.find(&|el| el.on_click == Some(Action::DownloadUpdate)).is_some());
    }

    #[test]
    fn test_ready_offers_restart() {
        let node = render(enabled(UpdateStatus::Ready), SettingsTab::About);
        let control = node.region("update-control").unwrap();
        assert!(control.find(&|el| el.on_click == Some(Action::InstallUpdate)).is_some());
    }
}
