//! Console configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Result;

/// Main console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the Keybrame server
    pub server_url: String,
    /// Idle time after the last port keystroke before settings auto-save
    pub settings_debounce_ms: u64,
    /// Fixed wait between a port-change restart and reconnecting on the new port
    pub restart_redirect_ms: u64,
    /// Wait after a manual restart before reloading all data
    pub restart_reload_ms: u64,
    /// Toast lifetime
    pub toast_ttl_ms: u64,
    /// Maximum toasts visible at once
    pub max_toasts: usize,
    /// Default target for `export`
    pub export_path: PathBuf,
    /// Real-time reconnect back-off (initial / cap)
    pub reconnect_delay_ms: u64,
    pub reconnect_max_delay_ms: u64,
    /// HTTP request timeout
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            settings_debounce_ms: 2000,
            restart_redirect_ms: 4000,
            restart_reload_ms: 2000,
            toast_ttl_ms: 3000,
            max_toasts: 3,
            export_path: PathBuf::from("keybrame-config.json"),
            reconnect_delay_ms: 1000,
            reconnect_max_delay_ms: 5000,
            request_timeout_secs: 10,
        }
    }
}

impl ConsoleConfig {
    /// `<config_dir>/keybrame/console.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keybrame")
            .join("console.toml")
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn settings_debounce(&self) -> Duration {
        Duration::from_millis(self.settings_debounce_ms)
    }

    pub fn restart_redirect(&self) -> Duration {
        Duration::from_millis(self.restart_redirect_ms)
    }

    pub fn restart_reload(&self) -> Duration {
        Duration::from_millis(self.restart_reload_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
