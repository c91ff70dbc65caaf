//! Deskkit Core Integration Tests

use std::sync::Arc;

use async_trait::async_trait;
use deskkit_core::{
    InitStage, Provider,
    config::{
        Config, ComponentOverrides, NavItem, PartialConfig, PartialDatabase, PartialFeatures,
        PartialSlots, TitleBarSlots, merge,
    },
    storage::{Database, DatabaseOptions, Migration},
    theme::ThemeMode,
    ui::{
        Action, Element, MemoryRouter, Node, NavItemProps, Override, RenderContext, Router,
        SettingsPageProps, SettingsTab, ShellProps, render_settings_page,
    },
    updater::{DownloadEvent, PendingUpdate, UpdateService, UpdateStatus},
};
use serde_json::json;

struct StaticUpdate;

#[async_trait]
impl PendingUpdate for StaticUpdate {
    fn version(&self) -> &str {
        "1.2.0"
    }

    fn current_version(&self) -> &str {
        "1.0.0"
    }

    async fn download_and_install(
        &self,
        on_event: &mut (dyn FnMut(DownloadEvent) + Send),
    ) -> anyhow::Result<()> {
        on_event(DownloadEvent::Started {
            content_length: Some(4),
        });
        on_event(DownloadEvent::Progress { chunk_length: 4 });
        on_event(DownloadEvent::Finished);
        Ok(())
    }
}

struct StaticFeed;

#[async_trait]
impl UpdateService for StaticFeed {
    async fn check(&self) -> anyhow::Result<Option<Box<dyn PendingUpdate>>> {
        Ok(Some(Box::new(StaticUpdate)))
    }

    async fn relaunch(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn in_memory() -> Option<PartialDatabase> {
    Some(PartialDatabase {
        name: Some(":memory:".into()),
        ..Default::default()
    })
}

#[test]
fn test_toml_config_merges_onto_defaults() {
    let partial = PartialConfig::from_toml_str(
        r#"
        [brand]
        name = "Notes"

        [layout.sidebar]
        position = "right"
        width = 0

        [[nav]]
        title = "nav.home"
        path = "/"
        icon = "home"
        "#,
    )
    .unwrap();

    let config = merge(Config::default(), partial);
    assert_eq!(config.brand.name, "Notes");
    assert_eq!(config.layout.sidebar.width, 0);
    assert_eq!(config.layout.title_bar.height, 40);
    assert_eq!(config.nav, vec![NavItem::new("nav.home", "/", "home")]);
}

#[tokio::test]
async fn test_app_lifecycle() {
    let config = PartialConfig {
        nav: Some(vec![
            NavItem::new("nav.home", "/", "home"),
            NavItem::new("nav.notes", "/notes", "file"),
        ]),
        slots: Some(PartialSlots {
            title_bar: Some(TitleBarSlots {
                center: Some(Node::text("search box")),
                ..Default::default()
            }),
            ..Default::default()
        }),
        components: Some(ComponentOverrides {
            nav_item: Some(Override::from_fn(|_cx: &RenderContext<'_>, props: &NavItemProps| {
                Element::new("span")
                    .class("custom-row")
                    .class_if(props.is_active, "on")
                    .child(props.item.path.clone())
                    .into()
            })),
            ..Default::default()
        }),
        database: in_memory(),
        ..Default::default()
    };

    let mut app = Provider::new(config)
        .with_update_service(Arc::new(StaticFeed))
        .mount()
        .await
        .unwrap();
    let router = MemoryRouter::new("/notes").route("/notes", |_cx: &RenderContext<'_>| {
        Node::text("notes page")
    });

    let node = app.render(&router, &ShellProps::default());
    let rows = node.find_all(&|el| el.has_class("custom-row"));
    assert_eq!(rows.len(), 2);
    assert!(rows[1].has_class("on"));
    assert!(node.text_content().contains("search box"));
    assert!(node.text_content().contains("notes page"));

    // update flow driven by actions
    app.handle(Action::CheckForUpdates, &router).await.unwrap();
    assert_eq!(app.updater().status(), UpdateStatus::Available);
    app.handle(Action::DownloadUpdate, &router).await.unwrap();
    assert_eq!(app.updater().status(), UpdateStatus::Ready);
    assert_eq!(app.updater().progress().map(|p| p.percent), Some(100));

    app.handle(Action::SelectSettingsTab(SettingsTab::About), &router)
        .await
        .unwrap();
    let cx = app.render_context(&router);
    let page = render_settings_page(&cx, &SettingsPageProps::default());
    assert!(page.actions().contains(&&Action::InstallUpdate));

    app.handle(Action::SetThemeMode(ThemeMode::Dark), &router)
        .await
        .unwrap();
    app.shutdown().await;
}

#[tokio::test]
async fn test_settings_survive_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.db");

    let db = Database::new(DatabaseOptions::with_path(&path)).await.unwrap();
    db.settings().set("a", &json!({"a": 1})).await.unwrap();
    db.settings().set("greeting", "hello").await.unwrap();
    db.app_state().set("sidebar", &json!({"open": true})).await.unwrap();
    db.close().await;

    let migrations = vec![Migration::new(
        10,
        "create_notes",
        "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)",
    )];
    let db = Database::new(DatabaseOptions::with_path(&path).migrations(migrations))
        .await
        .unwrap();
    assert_eq!(db.settings().get("a").await.unwrap(), Some(json!({"a": 1})));
    assert_eq!(db.settings().get("greeting").await.unwrap(), Some(json!("hello")));
    assert_eq!(
        db.app_state().get("sidebar").await.unwrap(),
        Some(json!({"open": true}))
    );

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.current_version, 10);
    assert!(!status.needs_migration);
    db.close().await;
}

#[tokio::test]
async fn test_updater_disabled_by_features() {
    let config = PartialConfig {
        features: Some(PartialFeatures {
            updater: Some(false),
            ..Default::default()
        }),
        database: in_memory(),
        ..Default::default()
    };
    let mut app = Provider::new(config)
        .with_update_service(Arc::new(StaticFeed))
        .mount()
        .await
        .unwrap();
    let router = MemoryRouter::new("/");

    app.handle(Action::CheckForUpdates, &router).await.unwrap();
    assert_eq!(app.updater().status(), UpdateStatus::Idle);
    assert!(!app.chrome().update.enabled);
}

#[tokio::test]
async fn test_unreadable_database_path_fails_mount() {
    let dir = tempfile::TempDir::new().unwrap();
    // a directory where the database file should be
    let blocked = dir.path().join("app.db");
    std::fs::create_dir_all(&blocked).unwrap();

    let failure = Provider::new(PartialConfig::default())
        .with_data_dir(dir.path())
        .mount()
        .await
        .unwrap_err();
    assert_eq!(failure.stage, InitStage::Database);
    assert!(failure.screen.region("database-error").is_some());
}

#[test]
fn test_router_prefix_matching() {
    let router = MemoryRouter::new("/notes/42");
    assert!(router.is_active("/notes"));
    assert!(!router.is_active("/"));
    assert!(!router.is_active("/note"));
}
