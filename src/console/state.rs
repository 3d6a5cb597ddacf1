//! View state of the admin console

use std::time::Instant;

use super::confirm::{ConfirmDialog, PendingAction};
use super::editor::KeybindingForm;
use super::picker::ImagePicker;
use super::recorder::KeyRecorder;
use super::reorder::{DragState, RowBox};
use super::settings_form::SettingsForm;
use super::toast::ToastQueue;
use crate::config::ConsoleConfig;
use crate::models::{FocusedPane, ImageAsset, Keybinding, Overlay, Settings, ToastKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBanner {
    pub version: String,
    pub downloading: bool,
    pub progress: Option<u8>,
}

impl UpdateBanner {
    pub fn status_text(&self) -> String {
        match (self.downloading, self.progress) {
            (_, Some(progress)) => format!("{}%", progress),
            (true, None) => "Downloading...".to_string(),
            (false, None) => "Update now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Upload,
    Import,
    Export,
}

impl PromptPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            PromptPurpose::Upload => "Upload images (space separated paths)",
            PromptPurpose::Import => "Import configuration from",
            PromptPurpose::Export => "Export configuration to",
        }
    }
}

/// Single-line file path input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub purpose: PromptPurpose,
    pub input: String,
}

#[derive(Debug)]
pub struct ConsoleState {
    pub settings: Option<Settings>,
    pub images: Vec<ImageAsset>,
    pub keybindings: Vec<Keybinding>,
    pub version: Option<String>,

    pub settings_form: SettingsForm,
    pub editor: Option<KeybindingForm>,
    pub picker: Option<ImagePicker>,
    pub confirm: Option<ConfirmDialog<PendingAction>>,
    pub prompt: Option<PathPrompt>,
    pub recorder: KeyRecorder,

    pub toasts: ToastQueue,
    /// Keys currently held on the server machine, first-pressed first
    pub pressed_keys: Vec<String>,
    pub overlay: Overlay,
    pub update_banner: Option<UpdateBanner>,
    update_announced: bool,
    pub server_stopping: bool,
    pub server_updating: bool,
    pub connected: bool,

    pub focus: FocusedPane,
    pub keybinding_cursor: usize,
    pub image_cursor: usize,
    pub show_help: bool,
    pub drag: Option<DragState>,
    /// Rows as last rendered, used to hit-test mouse drags
    pub row_layout: Vec<RowBox>,

    /// Pending rebase onto a new port after a restart
    pub redirect_at: Option<(Instant, u16)>,
    /// Pending full reload after a manual restart
    pub reload_at: Option<Instant>,
    pub should_quit: bool,
}

impl ConsoleState {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            settings: None,
            images: Vec::new(),
            keybindings: Vec::new(),
            version: None,
            settings_form: SettingsForm::default(),
            editor: None,
            picker: None,
            confirm: None,
            prompt: None,
            recorder: KeyRecorder::default(),
            toasts: ToastQueue::new(config.max_toasts, config.toast_ttl()),
            pressed_keys: Vec::new(),
            overlay: Overlay::None,
            update_banner: None,
            update_announced: false,
            server_stopping: false,
            server_updating: false,
            connected: false,
            focus: FocusedPane::default(),
            keybinding_cursor: 0,
            image_cursor: 0,
            show_help: false,
            drag: None,
            row_layout: Vec::new(),
            redirect_at: None,
            reload_at: None,
            should_quit: false,
        }
    }

    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.toasts.push(kind, message, Instant::now())
    }

    pub fn key_pressed(&mut self, key: String) {
        if !self.pressed_keys.contains(&key) {
            self.pressed_keys.push(key);
        }
    }

    pub fn key_released(&mut self, key: &str) {
        self.pressed_keys.retain(|k| k != key);
    }

    /// Show the banner for the first announcement only
    pub fn announce_update(&mut self, version: String) -> bool {
        if self.update_announced || self.update_banner.is_some() {
            return false;
        }
        self.update_announced = true;
        self.update_banner = Some(UpdateBanner {
            version,
            downloading: false,
            progress: None,
        });
        true
    }

    pub fn keybinding_order(&self) -> Vec<i64> {
        self.keybindings.iter().map(|kb| kb.id).collect()
    }

    /// Rearrange the cached list to follow `order`
    pub fn apply_order(&mut self, order: &[i64]) {
        self.keybindings
            .sort_by_key(|kb| order.iter().position(|id| *id == kb.id).unwrap_or(usize::MAX));
    }

    pub fn selected_keybinding(&self) -> Option<&Keybinding> {
        self.keybindings.get(self.keybinding_cursor)
    }

    pub fn selected_image(&self) -> Option<&ImageAsset> {
        self.images.get(self.image_cursor)
    }

    pub fn clamp_cursors(&mut self) {
        self.keybinding_cursor = self
            .keybinding_cursor
            .min(self.keybindings.len().saturating_sub(1));
        self.image_cursor = self.image_cursor.min(self.images.len().saturating_sub(1));
        if let Some(picker) = self.picker.as_mut() {
            picker.clamp(self.images.len());
        }
    }

    /// Whether a modal currently captures keyboard input
    pub fn modal_open(&self) -> bool {
        self.confirm.is_some()
            || self.picker.is_some()
            || self.prompt.is_some()
            || self.editor.is_some()
            || self.show_help
    }

    /// Forget per-session view state, as a fresh page load would
    pub fn reset_transient(&mut self) {
        self.overlay = Overlay::None;
        self.server_updating = false;
        self.server_stopping = false;
        self.update_banner = None;
        self.update_announced = false;
        self.pressed_keys.clear();
        self.drag = None;
        self.confirm = None;
        self.picker = None;
        self.prompt = None;
        self.editor = None;
        self.recorder.cancel();
    }
}
