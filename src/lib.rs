//! Keybrame Console - terminal admin console for the Keybrame overlay server
//!
//! Manages keybindings, the uploaded image library and server settings of a
//! running Keybrame instance over its REST API, and mirrors its real-time
//! Socket.IO channel (pressed keys, update progress, server lifecycle).

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod models;
pub mod realtime;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// Console version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "keybrame-console";
