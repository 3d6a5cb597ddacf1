//! Configuration commands: `export`, `import`, `reload`, `init-config`

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::api::Backend;
use crate::config::ConsoleConfig;

pub async fn execute_export_command(backend: &impl Backend, path: &Path) -> Result<()> {
    let config = backend.export_config().await?;
    let json = serde_json::to_string_pretty(&config)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("📦 Configuration exported to {}", path.display());
    Ok(())
}

pub async fn execute_import_command(backend: &impl Backend, path: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let config: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))?;
    backend.import_config(&config).await?;
    println!("📥 Configuration imported from {}", path.display());
    Ok(())
}

pub async fn execute_reload_command(backend: &impl Backend) -> Result<()> {
    backend.reload().await?;
    println!("🔄 Configuration reloaded");
    Ok(())
}

pub fn execute_init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    ConsoleConfig::default().save(path)?;
    println!("📝 Wrote default configuration to {}", path.display());
    Ok(())
}
