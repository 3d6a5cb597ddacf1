//! Keybinding editor form (create / edit modal)

use crate::errors::{ConsoleError, Result};
use crate::models::{
    BindingType, Keybinding, KeybindingPayload, Transition, add_images_prefix,
    remove_images_prefix,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Keys,
    Type,
    Image,
    Description,
    TransitionInEnabled,
    TransitionInImage,
    TransitionInDuration,
    TransitionOutEnabled,
    TransitionOutImage,
    TransitionOutDuration,
}

const FIELD_ORDER: [EditorField; 10] = [
    EditorField::Keys,
    EditorField::Type,
    EditorField::Image,
    EditorField::Description,
    EditorField::TransitionInEnabled,
    EditorField::TransitionInImage,
    EditorField::TransitionInDuration,
    EditorField::TransitionOutEnabled,
    EditorField::TransitionOutImage,
    EditorField::TransitionOutDuration,
];

/// Enter / exit transition inputs. `image` is held without the `assets/` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionFields {
    pub enabled: bool,
    pub image: String,
    pub duration: String,
}

impl TransitionFields {
    fn from_transition(transition: Option<&Transition>) -> Self {
        match transition {
            Some(t) => Self {
                enabled: true,
                image: remove_images_prefix(&t.image).to_string(),
                duration: t.duration.map(|d| d.to_string()).unwrap_or_default(),
            },
            None => Self::default(),
        }
    }

    /// unchecked -> explicit null, checked without image -> omitted
    fn to_payload(&self) -> Option<Option<Transition>> {
        if !self.enabled {
            return Some(None);
        }
        if self.image.is_empty() {
            return None;
        }
        Some(Some(Transition {
            image: add_images_prefix(&self.image),
            duration: self.duration.trim().parse().ok(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingForm {
    pub editing_id: Option<i64>,
    pub selected_keys: Vec<String>,
    pub binding_type: BindingType,
    /// Main image, without the `assets/` prefix
    pub image: String,
    pub description: String,
    pub transition_in: TransitionFields,
    pub transition_out: TransitionFields,
    pub focus: EditorField,
}

impl Default for KeybindingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingForm {
    pub fn new() -> Self {
        Self {
            editing_id: None,
            selected_keys: Vec::new(),
            binding_type: BindingType::Toggle,
            image: String::new(),
            description: String::new(),
            transition_in: TransitionFields::default(),
            transition_out: TransitionFields::default(),
            focus: EditorField::Keys,
        }
    }

    pub fn from_keybinding(keybinding: &Keybinding) -> Self {
        Self {
            editing_id: Some(keybinding.id),
            selected_keys: keybinding.keys.clone(),
            binding_type: keybinding.binding_type,
            image: remove_images_prefix(&keybinding.image).to_string(),
            description: keybinding.description_text().to_string(),
            transition_in: TransitionFields::from_transition(keybinding.transition_in.as_ref()),
            transition_out: TransitionFields::from_transition(keybinding.transition_out.as_ref()),
            focus: EditorField::Keys,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit Keybinding"
        } else {
            "Add Keybinding"
        }
    }

    /// Validated request body; no keys means no request
    pub fn to_payload(&self) -> Result<KeybindingPayload> {
        if self.selected_keys.is_empty() {
            return Err(ConsoleError::Validation(
                "Please select at least one key".into(),
            ));
        }
        Ok(KeybindingPayload {
            keys: self.selected_keys.clone(),
            binding_type: self.binding_type,
            image: add_images_prefix(&self.image),
            description: self.description.clone(),
            transition_in: self.transition_in.to_payload(),
            transition_out: self.transition_out.to_payload(),
        })
    }

    pub fn remove_key(&mut self, key: &str) {
        self.selected_keys.retain(|k| k != key);
    }

    pub fn remove_last_key(&mut self) -> Option<String> {
        self.selected_keys.pop()
    }

    pub fn clear_keys(&mut self) {
        self.selected_keys.clear();
    }

    fn is_visible(&self, field: EditorField) -> bool {
        match field {
            EditorField::TransitionInImage | EditorField::TransitionInDuration => {
                self.transition_in.enabled
            }
            EditorField::TransitionOutImage | EditorField::TransitionOutDuration => {
                self.transition_out.enabled
            }
            _ => true,
        }
    }

    pub fn visible_fields(&self) -> Vec<EditorField> {
        FIELD_ORDER
            .iter()
            .copied()
            .filter(|field| self.is_visible(*field))
            .collect()
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_previous(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: isize) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let len = fields.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.focus = fields[next];
    }

    /// Space / Enter on a non-text field
    pub fn activate_focused(&mut self) {
        match self.focus {
            EditorField::Type => self.binding_type = self.binding_type.flipped(),
            EditorField::TransitionInEnabled => {
                self.transition_in.enabled = !self.transition_in.enabled;
            }
            EditorField::TransitionOutEnabled => {
                self.transition_out.enabled = !self.transition_out.enabled;
            }
            _ => {}
        }
    }

    /// Whether the focused field accepts free text
    pub fn focused_is_text(&self) -> bool {
        matches!(
            self.focus,
            EditorField::Description
                | EditorField::TransitionInDuration
                | EditorField::TransitionOutDuration
        )
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            EditorField::Description => self.description.push(c),
            EditorField::TransitionInDuration if c.is_ascii_digit() => {
                self.transition_in.duration.push(c);
            }
            EditorField::TransitionOutDuration if c.is_ascii_digit() => {
                self.transition_out.duration.push(c);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            EditorField::Description => {
                self.description.pop();
            }
            EditorField::TransitionInDuration => {
                self.transition_in.duration.pop();
            }
            EditorField::TransitionOutDuration => {
                self.transition_out.duration.pop();
            }
            EditorField::Keys => {
                self.remove_last_key();
            }
            _ => {}
        }
    }
}
