//! Deskkit Playground - drive the shell from a terminal
//!
//! The playground mounts a full app context (config, i18n, SQLite storage,
//! theme and a simulated update feed) and draws the rendered shell with
//! ratatui. Every clickable element is a focus target; pressing enter hands
//! its action to the app exactly as a desktop host would.

mod app;
mod feed;
mod view;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::Playground;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Log to a file, the terminal belongs to the UI
    let data_dir = deskkit_core::storage::default_data_dir();
    deskkit_core::logging::init_file_tracing(
        &data_dir.join("playground.log"),
        &["deskkit_playground"],
    )?;

    let database = std::env::var("DESKKIT_PLAYGROUND_DB").unwrap_or_else(|_| "playground.db".into());
    let mut playground = match app::mount(app::playground_config(&database), app::router()).await {
        Ok(playground) => playground,
        Err(e) => {
            eprintln!("Failed to start: {:#}", e);
            return Err(e);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut playground).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    playground.shutdown().await;
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    playground: &mut Playground,
) -> anyhow::Result<()> {
    while !playground.should_quit() {
        let tree = playground.tree();
        let info = playground.frame_info();
        terminal.draw(|frame| view::draw(frame, &tree, &info))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    playground.on_key(key.code).await;
                }
            }
        }
    }
    Ok(())
}
