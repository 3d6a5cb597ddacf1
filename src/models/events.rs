//! Events flowing into the console: real-time pushes from the server and
//! internal application events

use serde::Deserialize;
use serde_json::Value;

/// Keys the capture layer reports when it cannot identify a key
pub const UNKNOWN_KEY_SENTINELS: [&str; 3] = ["<unknown>", "?", "unknown"];

pub fn is_unknown_key(key: &str) -> bool {
    UNKNOWN_KEY_SENTINELS.contains(&key)
}

/// Typed Socket.IO events published by the Keybrame server
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected,
    Disconnected,
    KeyPressed { key: String },
    KeyReleased { key: String },
    UpdateAvailable { version: String },
    UpdateProgress { progress: u8 },
    UpdateInstalling,
    UpdateError { error: String },
    ImageChange { image: String },
    ConfigReloaded,
    /// Any event name the console does not consume
    Other { name: String, data: Value },
}

#[derive(Deserialize)]
struct KeyData {
    key: String,
}

#[derive(Deserialize)]
struct VersionData {
    version: String,
}

#[derive(Deserialize)]
struct ProgressData {
    progress: f64,
}

#[derive(Deserialize)]
struct ErrorData {
    error: String,
}

#[derive(Deserialize)]
struct ImageData {
    image: String,
}

impl ServerEvent {
    /// Map a Socket.IO `[name, data]` pair onto a typed event.
    /// Payloads that do not match the expected shape degrade to `Other`.
    pub fn from_socket_event(name: &str, data: Value) -> Self {
        let parsed = match name {
            "key_pressed" => serde_json::from_value::<KeyData>(data.clone())
                .ok()
                .map(|d| ServerEvent::KeyPressed { key: d.key }),
            "key_released" => serde_json::from_value::<KeyData>(data.clone())
                .ok()
                .map(|d| ServerEvent::KeyReleased { key: d.key }),
            "update_available" => serde_json::from_value::<VersionData>(data.clone())
                .ok()
                .map(|d| ServerEvent::UpdateAvailable { version: d.version }),
            "update_progress" => serde_json::from_value::<ProgressData>(data.clone())
                .ok()
                .map(|d| ServerEvent::UpdateProgress {
                    progress: d.progress.clamp(0.0, 100.0).round() as u8,
                }),
            "update_installing" => Some(ServerEvent::UpdateInstalling),
            "update_error" => serde_json::from_value::<ErrorData>(data.clone())
                .ok()
                .map(|d| ServerEvent::UpdateError { error: d.error }),
            "image_change" => serde_json::from_value::<ImageData>(data.clone())
                .ok()
                .map(|d| ServerEvent::ImageChange { image: d.image }),
            "config_reloaded" => Some(ServerEvent::ConfigReloaded),
            _ => None,
        };

        parsed.unwrap_or_else(|| ServerEvent::Other {
            name: name.to_string(),
            data,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ServerEvent::Connected => "connect",
            ServerEvent::Disconnected => "disconnect",
            ServerEvent::KeyPressed { .. } => "key_pressed",
            ServerEvent::KeyReleased { .. } => "key_released",
            ServerEvent::UpdateAvailable { .. } => "update_available",
            ServerEvent::UpdateProgress { .. } => "update_progress",
            ServerEvent::UpdateInstalling => "update_installing",
            ServerEvent::UpdateError { .. } => "update_error",
            ServerEvent::ImageChange { .. } => "image_change",
            ServerEvent::ConfigReloaded => "config_reloaded",
            ServerEvent::Other { name, .. } => name,
        }
    }
}

/// Application events for the TUI loop
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Server(ServerEvent),
}
