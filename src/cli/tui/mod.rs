//! Terminal User Interface components

pub mod event_loop;
pub mod ui;


use crate::api::Backend;
use crate::console::Console;
use anyhow::Result;

/// Run the Terminal User Interface
pub async fn run_tui<B: Backend>(console: Console<B>) -> Result<()> {
    event_loop::run_tui_event_loop(console).await
}
