//! Headless command implementations

pub mod config;
pub mod images;
pub mod keybindings;
pub mod server;
pub mod settings;
pub mod watch;

use crate::api::KeybrameClient;
use crate::cli::args::Commands;
use crate::config::ConsoleConfig;
use anyhow::Result;
use std::path::Path;

/// Execute a CLI command
pub async fn execute_command(
    command: Commands,
    config: &ConsoleConfig,
    config_path: &Path,
) -> Result<()> {
    if let Commands::InitConfig { force } = command {
        return config::execute_init_config_command(config_path, force);
    }

    let client = KeybrameClient::new(&config.server_url, config.request_timeout())?;
    match command {
        Commands::List => keybindings::execute_list_command(&client).await,
        Commands::Images => images::execute_images_command(&client).await,
        Commands::Upload { files } => images::execute_upload_command(&client, &files).await,
        Commands::DeleteImage { name } => {
            images::execute_delete_image_command(&client, &name).await
        }
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| config.export_path.clone());
            config::execute_export_command(&client, &path).await
        }
        Commands::Import { path } => config::execute_import_command(&client, &path).await,
        Commands::Reload => config::execute_reload_command(&client).await,
        Commands::Settings {
            port,
            default_image,
        } => settings::execute_settings_command(&client, port, default_image).await,
        Commands::Restart => server::execute_restart_command(&client).await,
        Commands::Shutdown => server::execute_shutdown_command(&client).await,
        Commands::Version => server::execute_version_command(&client).await,
        Commands::Watch => watch::execute_watch_command(&client, config).await,
        Commands::InitConfig { .. } => Ok(()),
    }
}
