//! `settings` command - show or update server settings

use anyhow::Result;

use crate::api::Backend;
use crate::models::{SettingsUpdate, add_images_prefix, remove_images_prefix, validate_port};

pub async fn execute_settings_command(
    backend: &impl Backend,
    port: Option<String>,
    default_image: Option<String>,
) -> Result<()> {
    // Validate before any request
    let port = port.as_deref().map(validate_port).transpose()?;

    let current = backend.settings().await?;
    if port.is_none() && default_image.is_none() {
        println!("⚙️  Settings:");
        println!("  Port:          {}", current.port_or_default());
        println!(
            "  Default image: {}",
            remove_images_prefix(&current.default_image)
        );
        if let Some(combo) = &current.shutdown_combo {
            println!("  Shutdown combo: {}", combo.join(" + "));
        }
        println!("  OBS URL:       {}", current.obs_url());
        return Ok(());
    }

    let update = SettingsUpdate {
        port: port.unwrap_or_else(|| current.port_or_default()),
        default_image: add_images_prefix(
            default_image
                .as_deref()
                .unwrap_or_else(|| remove_images_prefix(&current.default_image)),
        ),
    };
    let response = backend.update_settings(&update).await?;
    backend.reload().await?;
    println!("✅ Settings saved");

    if response.reload_required {
        println!("🔁 Restarting server on port {}...", update.port);
        if let Err(e) = backend.restart_server().await {
            log::debug!("restart request failed, server is likely already restarting: {}", e);
        }
        println!(
            "   Reconnect with --server http://localhost:{}",
            update.port
        );
    }
    Ok(())
}
