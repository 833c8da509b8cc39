//! Studio administration terminal user interface
//!
//! List screens load pages in the background and discard results that arrive
//! after the screen was left. Record forms validate locally, send a single
//! mutation and return to the related list on success.

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

pub use app::App;

use crate::config::Config;
use crate::graphql::GraphQLApi;

/// Set up the terminal, run the app until the user quits and restore the terminal
pub async fn run(config: Config, api: Arc<dyn GraphQLApi>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Starting TUI against {}", config.api_url);
    let mut app = App::new(config, api);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}
