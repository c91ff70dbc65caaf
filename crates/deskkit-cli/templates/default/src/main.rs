mod config;
mod pages;

use std::path::Path;

use deskkit_core::Provider;
use deskkit_core::config::PartialConfig;
use deskkit_core::ui::ShellProps;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deskkit_core::logging::init_tracing(&[])?;

    let file_config = match Path::new("deskkit.toml") {
        path if path.exists() => PartialConfig::from_path(path)?,
        _ => PartialConfig::default(),
    };

    let mut app = match Provider::new(config::app_config())
        .with_file_config(file_config)
        .mount()
        .await
    {
        Ok(app) => app,
        Err(failure) => {
            eprintln!("{}", failure.screen.text_content());
            return Err(failure.into());
        }
    };

    let router = pages::router();
    let view = app.render(&router, &ShellProps::default());
    println!("{}", view.text_content());

    app.shutdown().await;
    Ok(())
}
