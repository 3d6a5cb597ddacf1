//! Utility functions and helpers used throughout the console

pub mod logging;
