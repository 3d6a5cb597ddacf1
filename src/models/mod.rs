//! Data models and types used throughout the console

pub mod events;
pub mod image;
pub mod keybinding;
pub mod settings;
pub mod tui;

// Re-export commonly used types
pub use events::*;
pub use image::*;
pub use keybinding::*;
pub use settings::*;

pub use tui::{FocusedPane, Overlay, ToastKind};
