//! Settings panel fields and the port auto-save debounce

use std::time::{Duration, Instant};

use crate::errors::Result;
use crate::models::{DEFAULT_PORT, Settings, SettingsUpdate, add_images_prefix, remove_images_prefix, validate_port};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub port_input: String,
    /// Default image, without the `assets/` prefix
    pub default_image: String,
    pub obs_url: String,
    debounce_at: Option<Instant>,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            port_input: settings.port_or_default().to_string(),
            default_image: remove_images_prefix(&settings.default_image).to_string(),
            obs_url: settings.obs_url(),
            debounce_at: None,
        }
    }

    /// Replace the fields from freshly loaded settings, keeping no pending save
    pub fn apply(&mut self, settings: &Settings) {
        *self = Self::from_settings(settings);
    }

    pub fn to_update(&self) -> Result<SettingsUpdate> {
        Ok(SettingsUpdate {
            port: validate_port(&self.port_input)?,
            default_image: add_images_prefix(&self.default_image),
        })
    }

    /// Port the form currently shows, falling back to the default
    pub fn port_hint(&self) -> u16 {
        self.port_input.trim().parse().unwrap_or(DEFAULT_PORT)
    }

    pub fn push_port_char(&mut self, c: char, now: Instant, delay: Duration) {
        if c.is_ascii_digit() {
            self.port_input.push(c);
            self.arm_debounce(now, delay);
        }
    }

    pub fn pop_port_char(&mut self, now: Instant, delay: Duration) {
        if self.port_input.pop().is_some() {
            self.arm_debounce(now, delay);
        }
    }

    /// (Re)start the auto-save countdown
    pub fn arm_debounce(&mut self, now: Instant, delay: Duration) {
        self.debounce_at = Some(now + delay);
    }

    pub fn clear_debounce(&mut self) {
        self.debounce_at = None;
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce_at.is_some()
    }

    /// Consume the deadline once it has passed
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.debounce_at {
            Some(at) if now >= at => {
                self.debounce_at = None;
                true
            }
            _ => false,
        }
    }
}
