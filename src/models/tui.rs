//! TUI-specific data models

use ratatui::style::Color;

/// Which pane is currently focused in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    #[default]
    Keybindings,
    Images,
    Settings,
}

impl FocusedPane {
    pub fn next(&self) -> Self {
        match self {
            FocusedPane::Keybindings => FocusedPane::Images,
            FocusedPane::Images => FocusedPane::Settings,
            FocusedPane::Settings => FocusedPane::Keybindings,
        }
    }
}

/// Toast severity with visual indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn color(&self) -> Color {
        match self {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Info => Color::Cyan,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Warning => "⚠️ ",
            ToastKind::Info => "ℹ️ ",
        }
    }
}

/// Full-screen overlays driven by server lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// An update is being installed; the console reloads when the server returns
    Updating,
    /// The server was shut down from this console
    Offline,
}
