//! Command Line Interface module
//!
//! This module contains the CLI argument parsing, headless command
//! implementations, and the Terminal User Interface (TUI).

pub mod args;
pub mod commands;
pub mod tui;

pub use args::*;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::api::KeybrameClient;
use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::realtime::EventHub;
use crate::utils::logging::init_cli_logging;

/// Resolve the config file path and load it, applying `--server`
pub fn load_config(cli: &Cli) -> Result<(ConsoleConfig, PathBuf)> {
    let path = cli.config.clone().unwrap_or_else(ConsoleConfig::default_path);
    let mut config = ConsoleConfig::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    Ok((config, path))
}

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let tui_mode = cli.command.is_none();
    init_cli_logging(cli.verbose, cli.quiet, tui_mode)?;

    let (config, config_path) = load_config(&cli)?;
    log::debug!("Using server {}", config.server_url);

    match cli.command.clone() {
        Some(command) => commands::execute_command(command, &config, &config_path).await,
        None => {
            let client = KeybrameClient::new(&config.server_url, config.request_timeout())?;
            let console = Console::new(client, config, EventHub::new());
            tui::run_tui(console).await
        }
    }
}
