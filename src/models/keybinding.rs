//! Keybinding records as served by `/api/keybindings`

use serde::{Deserialize, Serialize};

/// Activation mode of a keybinding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingType {
    /// Each press flips the overlay on or off
    #[default]
    Toggle,
    /// The overlay is shown only while the keys are held
    Hold,
}

impl BindingType {
    pub fn label(&self) -> &'static str {
        match self {
            BindingType::Toggle => "Toggle",
            BindingType::Hold => "Hold",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BindingType::Toggle => "⟳",
            BindingType::Hold => "✋",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            BindingType::Toggle => BindingType::Hold,
            BindingType::Hold => BindingType::Toggle,
        }
    }
}

/// Temporary image shown when a keybinding activates or deactivates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// A keybinding owned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybinding {
    pub id: i64,
    pub keys: Vec<String>,
    #[serde(rename = "type", default)]
    pub binding_type: BindingType,
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transition_in: Option<Transition>,
    #[serde(default)]
    pub transition_out: Option<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Keybinding {
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of a create (`POST`) or update (`PUT`) request.
///
/// Transitions are tri-state: `None` leaves the field out of the body,
/// `Some(None)` sends an explicit `null` (clears the transition) and
/// `Some(Some(_))` sends the transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeybindingPayload {
    pub keys: Vec<String>,
    #[serde(rename = "type")]
    pub binding_type: BindingType,
    pub image: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<Option<Transition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<Option<Transition>>,
}

/// Response of `POST /api/keybindings`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedKeybinding {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Body of `PUT /api/keybindings/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<i64>,
}

/// Human-readable label for a key identifier
pub fn format_key_name(key: &str) -> String {
    let mapped = match key {
        "mouse_left" => "Mouse L",
        "mouse_right" => "Mouse R",
        "mouse_middle" => "Mouse M",
        "scroll_up" => "Scroll ↑",
        "scroll_down" => "Scroll ↓",
        "space" => "Space",
        "enter" => "Enter",
        "backspace" => "Backspace",
        "ctrl" => "Ctrl",
        "shift" => "Shift",
        "alt" => "Alt",
        "cmd" => "Cmd",
        other => return other.to_uppercase(),
    };
    mapped.to_string()
}
