//! Playground state and key handling

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::KeyCode;
use deskkit_core::config::{
    Badge, NavItem, PartialBrand, PartialConfig, PartialDatabase, PartialSlots, TitleBarSlots,
};
use deskkit_core::platform::HeadlessWindow;
use deskkit_core::theme::ThemeMode;
use deskkit_core::ui::{
    Action, Element, MemoryRouter, Node, RenderContext, Router, SettingsPageProps, ShellProps,
    render_settings_page,
};
use deskkit_core::updater::UpdateStatus;
use deskkit_core::{AppContext, Provider};

use crate::feed::DemoFeed;
use crate::view::{self, FrameInfo, Palette};

/// Version offered by the simulated update feed
pub const DEMO_LATEST: &str = "0.2.0";

/// Base config for the playground
pub fn playground_config(database: &str) -> PartialConfig {
    PartialConfig {
        brand: Some(PartialBrand {
            name: Some("Deskkit Playground".to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            ..Default::default()
        }),
        nav: Some(vec![
            NavItem::new("Home", "/", "home"),
            NavItem::new("Inbox", "/inbox", "inbox").with_badge(Badge::Count(3)),
            NavItem::new("settings.title", "/settings", "settings"),
        ]),
        slots: Some(PartialSlots {
            title_bar: Some(TitleBarSlots {
                center: Some(Node::text("playground")),
                ..Default::default()
            }),
            ..Default::default()
        }),
        database: Some(PartialDatabase {
            name: Some(database.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Routes served by the playground
pub fn router() -> MemoryRouter {
    MemoryRouter::new("/")
        .route("/", |cx: &RenderContext<'_>| {
            Element::new("section")
                .child(Element::new("h1").child(cx.t(&cx.config().brand.name)))
                .child(Element::new("p").child("Drive the shell from the keyboard."))
                .child(
                    Element::new("button")
                        .on_click(Action::Custom("greet".to_string()))
                        .child("Say hello"),
                )
                .into()
        })
        .route("/inbox", |_cx: &RenderContext<'_>| {
            Element::new("section")
                .child(Element::new("h1").child("Inbox"))
                .child(Element::new("p").child("3 unread messages"))
                .into()
        })
        .route("/settings", |cx: &RenderContext<'_>| {
            render_settings_page(cx, &SettingsPageProps::default())
        })
}

/// Mount the app with the demo feed and a headless window
pub async fn mount(config: PartialConfig, router: MemoryRouter) -> anyhow::Result<Playground> {
    let window = Arc::new(HeadlessWindow::new());
    let feed = DemoFeed::new(Some(DEMO_LATEST));
    let relaunches = feed.relaunch_counter();
    let app = Provider::new(config)
        .with_update_service(Arc::new(feed))
        .with_window_controls(window.clone())
        .mount()
        .await?;
    Ok(Playground::new(app, router, window, relaunches))
}

pub struct Playground {
    app: AppContext,
    router: MemoryRouter,
    window: Arc<HeadlessWindow>,
    relaunches: Arc<AtomicUsize>,
    focus: usize,
    status: String,
    quit: bool,
}

impl Playground {
    pub fn new(
        app: AppContext,
        router: MemoryRouter,
        window: Arc<HeadlessWindow>,
        relaunches: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            app,
            router,
            window,
            relaunches,
            focus: 0,
            status: "ready".to_string(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn current_path(&self) -> String {
        self.router.current_path()
    }

    /// Render the shell and clamp focus to the visible targets
    pub fn tree(&mut self) -> Node {
        let tree = self.app.render(&self.router, &ShellProps::default());
        let count = view::targets(&tree).len();
        if count == 0 {
            self.focus = 0;
        } else if self.focus >= count {
            self.focus = count - 1;
        }
        tree
    }

    pub fn frame_info(&self) -> FrameInfo<'_> {
        FrameInfo {
            focus: Some(self.focus),
            palette: Palette::from_styles(self.app.styles()),
            sidebar_position: self.app.config().layout.sidebar.position,
            status: &self.status,
        }
    }

    pub async fn on_key(&mut self, key: KeyCode) {
        let tree = self.tree();
        let targets = view::targets(&tree);
        let count = targets.len();

        let action = match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                None
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.focus = (self.focus + 1) % count;
                }
                None
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    self.focus = (self.focus + count - 1) % count;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                targets.get(self.focus).and_then(|el| el.on_click.clone())
            }
            KeyCode::Char('m') => tree
                .region("title-bar")
                .and_then(|el| el.on_double_click.clone()),
            KeyCode::Char('t') => Some(Action::SetThemeMode(next_mode(self.app.theme_mode()))),
            KeyCode::Char('l') => next_language(
                self.app.i18n().language(),
                &self.app.i18n().supported_languages(),
            )
            .map(Action::ChangeLanguage),
            KeyCode::Char('u') => Some(update_step(self.app.updater().status())),
            KeyCode::Char('b') => {
                if !self.router.back() {
                    self.status = "already at the first page".to_string();
                }
                None
            }
            _ => None,
        };

        if let Some(action) = action {
            self.run(action).await;
        }
    }

    /// Hand an action to the app and describe the outcome
    pub async fn run(&mut self, action: Action) {
        tracing::debug!(?action, "playground action");
        let label = format!("{:?}", action);
        let relaunches = self.relaunches.load(Ordering::SeqCst);
        match self.app.handle(action, &self.router).await {
            Ok(Some(Action::Custom(name))) => {
                self.status = format!("custom action: {}", name);
            }
            Ok(_) if self.relaunches.load(Ordering::SeqCst) > relaunches => {
                self.status = "update installed, relaunch requested".to_string();
            }
            Ok(_) => {
                self.status = format!("{} | updater: {}", label, self.app.updater().status());
            }
            Err(e) => {
                tracing::warn!(error = %e, "action failed");
                self.status = format!("{} failed: {}", label, e);
            }
        }
        if self.window.is_closed() {
            self.quit = true;
        }
    }

    pub async fn shutdown(self) {
        self.app.shutdown().await;
    }
}

fn next_mode(current: ThemeMode) -> ThemeMode {
    let index = ThemeMode::ALL.iter().position(|m| *m == current).unwrap_or(0);
    ThemeMode::ALL[(index + 1) % ThemeMode::ALL.len()]
}

fn next_language(current: &str, supported: &[String]) -> Option<String> {
    if supported.is_empty() {
        return None;
    }
    let index = supported.iter().position(|l| l == current).unwrap_or(0);
    Some(supported[(index + 1) % supported.len()].clone())
}

/// The action that moves the update flow forward from `status`
fn update_step(status: UpdateStatus) -> Action {
    match status {
        UpdateStatus::Available | UpdateStatus::DownloadError => Action::DownloadUpdate,
        UpdateStatus::Ready => Action::InstallUpdate,
        _ => Action::CheckForUpdates,
    }
}
