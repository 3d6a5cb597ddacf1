//! Server settings singleton (`/api/settings`)

use serde::{Deserialize, Serialize};

use crate::errors::{ConsoleError, Result};

/// Port the backend listens on when the settings record has none
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub default_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_combo: Option<Vec<String>>,
}

impl Settings {
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// URL to paste into an OBS browser source
    pub fn obs_url(&self) -> String {
        format!("http://localhost:{}/", self.port_or_default())
    }
}

/// Body of `PUT /api/settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsUpdate {
    pub port: u16,
    pub default_image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsSaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "reloadRequired", default)]
    pub reload_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

/// Parse a port field; accepts integers in `1..=65535` only
pub fn validate_port(input: &str) -> Result<u16> {
    let invalid = || {
        ConsoleError::Validation("Invalid port. It must be a number between 1 and 65535.".into())
    };
    let value: i64 = input.trim().parse().map_err(|_| invalid())?;
    if !(1..=65535).contains(&value) {
        return Err(invalid());
    }
    u16::try_from(value).map_err(|_| invalid())
}
