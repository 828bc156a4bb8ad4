//! AI Image Analyzer
//!
//! Entry point for the application.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use image_analyzer::app::App;
use image_analyzer::cli::Args;
use image_analyzer::config::{API_KEY_VAR, Config};
use image_analyzer::core::GeminiClient;
use image_analyzer::logging;
use image_analyzer::tui::TerminalEventGuard;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let config = Config::resolve(&args);

    // The terminal is taken over below, so logs can only go to a file.
    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    if config.api_key.is_none() {
        tracing::warn!("{API_KEY_VAR} is not set; requests will fail until it is provided");
    }

    let backend = Arc::new(GeminiClient::from_config(&config));
    let mut app = App::new(&config, backend);

    // Initialize the terminal with crossterm backend
    let mut terminal = ratatui::init();

    let result = run_app(&mut terminal, &mut app);

    app.teardown();
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!("terminal error: {e}");
    }
    result
}

fn run_app(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> std::io::Result<()> {
    // Enable bracketed paste. The guard restores the terminal even on panic.
    //
    // IMPORTANT: This must be initialized after ratatui::init because
    // ratatui's terminal initialization can reset terminal flags.
    let _event_guard = TerminalEventGuard::new();

    loop {
        // Layout calculation happens inside the draw closure so it uses
        // the exact same area as rendering.
        terminal.draw(|frame| {
            app.update_layout(frame.area());
            app.render(frame);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Paste(text) => {
                    tracing::debug!(len = text.len(), "paste");
                    app.handle_paste(&text);
                }
                _ => {}
            }
        }

        // Apply inference and search results from background tasks
        app.process_events();

        // Advance animations
        app.tick();

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
