//! Error handling for the Keybrame console

pub mod types;

pub use types::*;
