//! Configuration management for the Keybrame console

pub mod app_config;

pub use app_config::*;
