//! Server lifecycle commands: `restart`, `shutdown`, `version`

use anyhow::Result;

use crate::api::Backend;

pub async fn execute_restart_command(backend: &impl Backend) -> Result<()> {
    backend.restart_server().await?;
    println!("🔁 Server restarting...");
    Ok(())
}

pub async fn execute_shutdown_command(backend: &impl Backend) -> Result<()> {
    backend.shutdown_server().await?;
    println!("⏻  Server shutting down...");
    Ok(())
}

pub async fn execute_version_command(backend: &impl Backend) -> Result<()> {
    let info = backend.version().await?;
    println!("Keybrame v{} at {}", info.version, backend.base_url());
    Ok(())
}
