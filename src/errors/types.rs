//! Custom error types for the Keybrame console

use std::fmt;

/// Main error type for console operations
#[derive(Debug)]
pub enum ConsoleError {
    /// Network / transport failures (connection refused, timeouts, ...)
    Transport(String),
    /// Non-2xx response from the backend
    Api { status: u16, message: String },
    /// Local validation rejected the input before any request was made
    Validation(String),
    /// Malformed Engine.IO / Socket.IO frame
    Protocol(String),
    /// Configuration file errors
    Config(String),
    /// System clipboard unavailable or refused the write
    Clipboard(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl ConsoleError {
    /// Build an API error from a `{error, details?}` body.
    /// `details` wins when present, joined with `", "`.
    pub fn from_api_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|parsed| match parsed.details {
                Some(details) if !details.is_empty() => Some(details.join(", ")),
                _ => parsed.error,
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        ConsoleError::Api { status, message }
    }
}

#[derive(serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Vec<String>>,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Transport(msg) => write!(f, "{}", msg),
            ConsoleError::Api { message, .. } => write!(f, "{}", message),
            ConsoleError::Validation(msg) => write!(f, "{}", msg),
            ConsoleError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            ConsoleError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ConsoleError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            ConsoleError::Io(err) => write!(f, "I/O error: {}", err),
            ConsoleError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::Serialization(err.to_string())
        } else {
            ConsoleError::Transport(err.to_string())
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ConsoleError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ConsoleError::Transport(err.to_string())
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConsoleError {
    fn from(err: toml::ser::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<url::ParseError> for ConsoleError {
    fn from(err: url::ParseError) -> Self {
        ConsoleError::Config(format!("invalid server URL: {}", err))
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
