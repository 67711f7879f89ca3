mod config;
mod controller;
mod logging;
mod model;
mod view;
mod viewmodel;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use controller::{AppController, Services};
use model::{AppModel, DiscogsClient};
use view::AppView;
use viewmodel::EnglishText;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(base_url = %config.base_url, "=== Discogs-RS Client Starting ===");

    let client = DiscogsClient::new(&config)?;
    let services = Services::new(Arc::new(client), Arc::new(EnglishText));
    let model = Arc::new(AppModel::new());
    let controller = AppController::new(model.clone(), services);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Discogs-RS Client shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        controller.collect_events().await;

        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let ui_state = model.get_ui_state().await;
        let content_view = controller.content_view().await;

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &content_view);
        })?;

        // Short poll keeps results from background loads flowing in
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
