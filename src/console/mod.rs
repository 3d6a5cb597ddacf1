//! Admin console controller
//!
//! [`Console`] owns the backend, the event hub and the [`ConsoleState`] that
//! the TUI renders. Every user-facing operation is a method here; errors are
//! logged and surfaced as toasts, never propagated, so the console stays
//! interactive whatever the backend does.

pub mod confirm;
pub mod editor;
pub mod picker;
pub mod recorder;
pub mod reorder;
pub mod settings_form;
pub mod state;
pub mod toast;

pub use confirm::{ConfirmDialog, PendingAction};
pub use editor::{EditorField, KeybindingForm, TransitionFields};
pub use picker::{ImagePicker, PickerTarget};
pub use recorder::KeyRecorder;
pub use reorder::{DragState, RowBox};
pub use settings_form::SettingsForm;
pub use state::{ConsoleState, PathPrompt, PromptPurpose, UpdateBanner};
pub use toast::{Toast, ToastQueue};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::api::Backend;
use crate::config::ConsoleConfig;
use crate::errors::{ConsoleError, Result};
use crate::models::{
    Overlay, ServerEvent, ToastKind, UploadFile, is_image_path, remove_images_prefix,
};
use crate::realtime::{self, Backoff, EventHub, RealtimeHandle};

pub struct Console<B: Backend> {
    backend: B,
    pub state: ConsoleState,
    hub: EventHub,
    config: ConsoleConfig,
    realtime: Option<RealtimeHandle>,
}

impl<B: Backend> Console<B> {
    pub fn new(backend: B, config: ConsoleConfig, hub: EventHub) -> Self {
        Self {
            state: ConsoleState::new(&config),
            backend,
            hub,
            config,
            realtime: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn fail(&mut self, context: &str, err: ConsoleError) {
        log::warn!("{}: {}", context, err);
        self.state
            .toast(ToastKind::Error, format!("{}: {}", context, err));
    }

    fn succeed(&mut self, message: impl Into<String>) {
        self.state.toast(ToastKind::Success, message);
    }

    /// Initial load followed by opening the real-time channel
    pub async fn start(&mut self) {
        self.load_all().await;
        self.connect_realtime();
    }

    pub fn connect_realtime(&mut self) {
        self.realtime = None;
        let backoff = Backoff {
            initial: Duration::from_millis(self.config.reconnect_delay_ms),
            max: Duration::from_millis(self.config.reconnect_max_delay_ms),
        };
        match realtime::spawn(&self.backend.base_url(), self.hub.clone(), backoff) {
            Ok(handle) => self.realtime = Some(handle),
            Err(e) => self.fail("Cannot open real-time channel", e),
        }
    }

    // ==================== Loading ====================

    pub async fn load_settings(&mut self) {
        match self.backend.settings().await {
            Ok(settings) => {
                self.state.settings_form.apply(&settings);
                self.state.settings = Some(settings);
            }
            Err(e) => self.fail("Failed to load settings", e),
        }
    }

    pub async fn load_keybindings(&mut self) {
        match self.backend.keybindings().await {
            Ok(keybindings) => {
                self.state.keybindings = keybindings;
                self.state.clamp_cursors();
            }
            Err(e) => self.fail("Failed to load keybindings", e),
        }
    }

    pub async fn load_images(&mut self) {
        match self.backend.images().await {
            Ok(images) => {
                self.state.images = images;
                self.state.clamp_cursors();
            }
            Err(e) => self.fail("Failed to load images", e),
        }
    }

    /// Version badge; failures are not shown
    pub async fn load_version(&mut self) {
        match self.backend.version().await {
            Ok(info) => self.state.version = Some(info.version),
            Err(e) => log::debug!("version unavailable: {}", e),
        }
    }

    pub async fn load_all(&mut self) {
        self.load_settings().await;
        self.load_images().await;
        self.load_keybindings().await;
        self.load_version().await;
    }

    /// Equivalent of reloading the page
    pub async fn full_reload(&mut self) {
        log::info!("Reloading console state");
        self.state.reset_transient();
        self.state.reload_at = None;
        self.load_all().await;
    }

    // ==================== Keybinding editor ====================

    pub fn open_editor(&mut self, id: Option<i64>) {
        let form = match id {
            Some(id) => match self.state.keybindings.iter().find(|kb| kb.id == id) {
                Some(keybinding) => KeybindingForm::from_keybinding(keybinding),
                None => {
                    self.state
                        .toast(ToastKind::Error, "Keybinding not found, reload the console");
                    return;
                }
            },
            None => KeybindingForm::new(),
        };
        self.state.recorder.cancel();
        self.state.editor = Some(form);
    }

    pub fn close_editor(&mut self) {
        self.state.recorder.cancel();
        self.state.editor = None;
        self.state.picker = None;
    }

    pub async fn save_keybinding(&mut self) -> bool {
        let Some(form) = self.state.editor.as_mut() else {
            return false;
        };
        if self.state.recorder.is_recording() {
            self.state.recorder.stop(&mut form.selected_keys);
        }
        let editing_id = form.editing_id;
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.state.toast(ToastKind::Error, e.to_string());
                return false;
            }
        };

        let result = match editing_id {
            Some(id) => self.backend.update_keybinding(id, &payload).await,
            None => self.backend.create_keybinding(&payload).await.map(|_| ()),
        };
        if let Err(e) = result {
            self.fail("Failed to save keybinding", e);
            return false;
        }

        self.succeed(if editing_id.is_some() {
            "Keybinding updated"
        } else {
            "Keybinding created"
        });
        self.close_editor();
        self.load_keybindings().await;
        self.reload_backend().await;
        true
    }

    pub fn remove_selected_key(&mut self, key: &str) {
        if let Some(form) = self.state.editor.as_mut() {
            form.remove_key(key);
        }
    }

    pub fn clear_selected_keys(&mut self) {
        if let Some(form) = self.state.editor.as_mut() {
            form.clear_keys();
        }
    }

    /// Start or stop recording keys into the open editor
    pub fn toggle_recording(&mut self) -> bool {
        let Some(form) = self.state.editor.as_mut() else {
            return false;
        };
        self.state.recorder.toggle(&self.hub, &mut form.selected_keys)
    }

    pub fn start_recording(&mut self) -> bool {
        if self.state.editor.is_none() {
            return false;
        }
        self.state.recorder.start(&self.hub)
    }

    pub fn stop_recording(&mut self) -> bool {
        match self.state.editor.as_mut() {
            Some(form) => self.state.recorder.stop(&mut form.selected_keys),
            None => false,
        }
    }

    // ==================== Confirmations ====================

    fn ask(&mut self, title: &str, message: String, action: PendingAction) {
        self.state.confirm = Some(ConfirmDialog::new(title, message, action));
    }

    pub fn request_delete_keybinding(&mut self, id: i64) {
        self.ask(
            "Delete keybinding",
            "Are you sure you want to delete this keybinding?".to_string(),
            PendingAction::DeleteKeybinding(id),
        );
    }

    pub fn request_delete_image(&mut self, filename: &str) {
        self.ask(
            "Delete image",
            format!(
                "Delete {}? Keybindings using it will show nothing.",
                remove_images_prefix(filename)
            ),
            PendingAction::DeleteImage(filename.to_string()),
        );
    }

    pub fn request_restart(&mut self) {
        self.ask(
            "Restart server",
            "Are you sure you want to restart the server?".to_string(),
            PendingAction::RestartServer,
        );
    }

    pub fn request_shutdown(&mut self) {
        self.ask(
            "Shut down server",
            "Are you sure you want to shut down the server?".to_string(),
            PendingAction::ShutdownServer,
        );
    }

    pub fn request_install_update(&mut self) {
        let Some(banner) = self.state.update_banner.as_ref() else {
            return;
        };
        let version = banner.version.clone();
        self.ask(
            "Update Keybrame",
            format!(
                "Version v{} will be downloaded and installed. The server will close and restart automatically.",
                version
            ),
            PendingAction::InstallUpdate { version },
        );
    }

    /// Close the dialog and run its action when confirmed
    pub async fn resolve_confirm(&mut self, confirmed: bool) {
        let Some(action) = self
            .state
            .confirm
            .take()
            .and_then(|dialog| dialog.resolve(confirmed))
        else {
            return;
        };
        match action {
            PendingAction::DeleteKeybinding(id) => self.delete_keybinding(id).await,
            PendingAction::DeleteImage(filename) => self.delete_image(&filename).await,
            PendingAction::RestartServer => self.restart_server().await,
            PendingAction::ShutdownServer => self.shutdown_server().await,
            PendingAction::InstallUpdate { .. } => self.install_update().await,
        }
    }

    async fn delete_keybinding(&mut self, id: i64) {
        match self.backend.delete_keybinding(id).await {
            Ok(()) => {
                self.succeed("Keybinding deleted");
                self.load_keybindings().await;
                self.reload_backend().await;
            }
            Err(e) => self.fail("Failed to delete keybinding", e),
        }
    }

    // ==================== Reordering ====================

    pub fn begin_drag(&mut self, row: f32) -> bool {
        self.state.drag = DragState::begin(&self.state.row_layout, row);
        self.state.drag.is_some()
    }

    pub fn drag_to(&mut self, row: f32) {
        let Some(drag) = self.state.drag else {
            return;
        };
        let mut order = self.state.keybinding_order();
        if drag.hover(&self.state.row_layout, &mut order, row) {
            self.state.apply_order(&order);
        }
    }

    pub async fn finish_drag(&mut self) {
        if self.state.drag.take().is_some() {
            self.reorder().await;
        }
    }

    /// Move the highlighted keybinding one row and persist the order
    pub async fn move_keybinding(&mut self, up: bool) {
        let mut order = self.state.keybinding_order();
        let Some(index) = reorder::shift(&mut order, self.state.keybinding_cursor, up) else {
            return;
        };
        self.state.apply_order(&order);
        self.state.keybinding_cursor = index;
        self.reorder().await;
    }

    /// PUT the rendered order
    pub async fn reorder(&mut self) {
        let order = self.state.keybinding_order();
        match self.backend.reorder_keybindings(&order).await {
            Ok(()) => self.succeed("Order saved"),
            Err(e) => {
                self.fail("Failed to save order", e);
                self.load_keybindings().await;
            }
        }
    }

    // ==================== Images ====================

    /// Upload one file at a time, then refresh the gallery
    pub async fn upload_images(&mut self, paths: &[PathBuf]) {
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let file = match UploadFile::from_path(path).await {
                Ok(file) => file,
                Err(e) => {
                    self.fail(&format!("Failed to upload {}", name), e.into());
                    continue;
                }
            };
            match self.backend.upload_image(file).await {
                Ok(uploaded) => self.succeed(format!(
                    "Uploaded: {}",
                    remove_images_prefix(&uploaded.filename)
                )),
                Err(e) => self.fail(&format!("Failed to upload {}", name), e),
            }
        }
        self.load_images().await;
    }

    /// Files dropped on the gallery; non-image files are skipped
    pub async fn upload_dropped(&mut self, paths: &[PathBuf]) {
        let images: Vec<PathBuf> = paths.iter().filter(|p| is_image_path(p)).cloned().collect();
        if images.len() < paths.len() {
            log::debug!("ignored {} non-image file(s)", paths.len() - images.len());
        }
        if images.is_empty() {
            self.state.toast(ToastKind::Warning, "No image files to upload");
            return;
        }
        self.upload_images(&images).await;
    }

    async fn delete_image(&mut self, filename: &str) {
        match self.backend.delete_image(filename).await {
            Ok(()) => {
                self.succeed(format!("Deleted: {}", remove_images_prefix(filename)));
                self.load_images().await;
            }
            Err(e) => self.fail("Failed to delete image", e),
        }
    }

    // ==================== Image picker ====================

    pub fn open_picker(&mut self, target: PickerTarget) {
        let current = match target {
            PickerTarget::Default => self.state.settings_form.default_image.clone(),
            _ => {
                let Some(form) = self.state.editor.as_ref() else {
                    return;
                };
                match target {
                    PickerTarget::Main => form.image.clone(),
                    PickerTarget::TransitionIn => form.transition_in.image.clone(),
                    _ => form.transition_out.image.clone(),
                }
            }
        };
        self.state.picker = Some(ImagePicker::open(target, &self.state.images, &current));
    }

    pub fn close_picker(&mut self) {
        self.state.picker = None;
    }

    /// Write the highlighted image into the picker's target
    pub async fn pick_selected(&mut self) {
        let Some(picker) = self.state.picker.take() else {
            return;
        };
        let Some(image) = self.state.images.get(picker.selected) else {
            return;
        };
        let path = remove_images_prefix(&image.path).to_string();
        self.select_image(picker.target, path).await;
    }

    pub async fn select_image(&mut self, target: PickerTarget, path: String) {
        let Some(form) = self.state.editor.as_mut() else {
            if target == PickerTarget::Default {
                self.state.settings_form.default_image = path;
                self.save_settings(true).await;
            }
            return;
        };
        match target {
            PickerTarget::Main => form.image = path,
            PickerTarget::TransitionIn => form.transition_in.image = path,
            PickerTarget::TransitionOut => form.transition_out.image = path,
            PickerTarget::Default => {
                self.state.settings_form.default_image = path;
                self.save_settings(true).await;
            }
        }
    }

    // ==================== Settings ====================

    pub fn on_port_char(&mut self, c: char) {
        let delay = self.config.settings_debounce();
        self.state
            .settings_form
            .push_port_char(c, Instant::now(), delay);
    }

    pub fn on_port_backspace(&mut self) {
        let delay = self.config.settings_debounce();
        self.state
            .settings_form
            .pop_port_char(Instant::now(), delay);
    }

    pub async fn save_settings(&mut self, silent: bool) -> bool {
        self.state.settings_form.clear_debounce();
        let update = match self.state.settings_form.to_update() {
            Ok(update) => update,
            Err(e) => {
                self.state.toast(ToastKind::Error, e.to_string());
                return false;
            }
        };

        let response = match self.backend.update_settings(&update).await {
            Ok(response) => response,
            Err(e) => {
                self.fail("Failed to save settings", e);
                return false;
            }
        };
        if !silent {
            self.succeed("Settings saved");
        }

        let settings = self.state.settings.get_or_insert_with(Default::default);
        settings.port = Some(update.port);
        settings.default_image = update.default_image.clone();
        self.state.settings_form.obs_url = settings.obs_url();

        self.reload_backend().await;
        if response.reload_required {
            self.restart_and_redirect(update.port).await;
        }
        true
    }

    /// Restart on the new port, then rebase once the fixed wait has elapsed
    pub async fn restart_and_redirect(&mut self, port: u16) {
        self.state
            .toast(ToastKind::Info, "Restarting server on the new port...");
        if let Err(e) = self.backend.restart_server().await {
            log::debug!("restart request failed, server is likely already restarting: {}", e);
        }
        self.state.redirect_at = Some((Instant::now() + self.config.restart_redirect(), port));
    }

    async fn redirect(&mut self, port: u16) {
        if let Err(e) = self.backend.rebase(port) {
            self.fail("Cannot switch to the new port", e);
            return;
        }
        log::info!("Switched to {}", self.backend.base_url());
        let reconnect = self.realtime.is_some();
        self.full_reload().await;
        if reconnect {
            self.connect_realtime();
        }
    }

    // ==================== Real-time ====================

    pub async fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected => {
                self.state.connected = true;
                if self.state.server_updating {
                    self.full_reload().await;
                }
            }
            ServerEvent::Disconnected => {
                self.state.connected = false;
                if self.state.server_updating {
                    self.state.overlay = Overlay::Updating;
                } else if self.state.server_stopping {
                    self.state.overlay = Overlay::Offline;
                }
            }
            ServerEvent::KeyPressed { key } => self.state.key_pressed(key),
            ServerEvent::KeyReleased { key } => self.state.key_released(&key),
            ServerEvent::UpdateAvailable { version } => {
                if self.state.announce_update(version.clone()) {
                    log::info!("Update available: v{}", version);
                }
            }
            ServerEvent::UpdateProgress { progress } => {
                if let Some(banner) = self.state.update_banner.as_mut() {
                    banner.progress = Some(progress);
                }
            }
            ServerEvent::UpdateInstalling => {
                self.state.server_updating = true;
                self.state.overlay = Overlay::Updating;
            }
            ServerEvent::UpdateError { error } => {
                log::warn!("update failed: {}", error);
                self.state
                    .toast(ToastKind::Error, format!("Update failed: {}", error));
            }
            ServerEvent::ImageChange { .. }
            | ServerEvent::ConfigReloaded
            | ServerEvent::Other { .. } => {}
        }
    }

    async fn install_update(&mut self) {
        if let Some(banner) = self.state.update_banner.as_mut() {
            banner.downloading = true;
        }
        if let Err(e) = self.backend.install_update().await {
            self.fail("Failed to start update", e);
        }
    }

    pub fn dismiss_update_banner(&mut self) {
        self.state.update_banner = None;
    }

    // ==================== Server config ====================

    pub async fn export_config(&mut self, path: &Path) -> bool {
        let result = async {
            let config = self.backend.export_config().await?;
            let json = serde_json::to_string_pretty(&config)?;
            tokio::fs::write(path, json).await?;
            Ok::<_, ConsoleError>(())
        }
        .await;
        match result {
            Ok(()) => {
                self.succeed(format!("Configuration exported to {}", path.display()));
                true
            }
            Err(e) => {
                self.fail("Failed to export configuration", e);
                false
            }
        }
    }

    pub async fn import_config(&mut self, path: &Path) -> bool {
        let config = match read_config_file(path).await {
            Ok(config) => config,
            Err(e) => {
                self.fail("Failed to import configuration", e);
                return false;
            }
        };
        if let Err(e) = self.backend.import_config(&config).await {
            self.fail("Failed to import configuration", e);
            return false;
        }
        self.succeed("Configuration imported");
        self.load_settings().await;
        self.load_keybindings().await;
        true
    }

    /// Ask the server to re-read its configuration
    pub async fn reload_config(&mut self) {
        match self.backend.reload().await {
            Ok(()) => self.succeed("Configuration reloaded"),
            Err(e) => self.fail("Failed to reload configuration", e),
        }
    }

    /// Reload after a mutation; only failures are shown
    async fn reload_backend(&mut self) {
        if let Err(e) = self.backend.reload().await {
            self.fail("Failed to reload configuration", e);
        }
    }

    async fn restart_server(&mut self) {
        match self.backend.restart_server().await {
            Ok(()) => {
                self.succeed("Server restarting...");
                self.state.reload_at = Some(Instant::now() + self.config.restart_reload());
            }
            Err(e) => self.fail("Failed to restart server", e),
        }
    }

    async fn shutdown_server(&mut self) {
        match self.backend.shutdown_server().await {
            Ok(()) => {
                self.state.server_stopping = true;
                self.succeed("Server shutting down...");
            }
            Err(e) => self.fail("Failed to shut down server", e),
        }
    }

    pub fn copy_obs_url(&mut self) {
        let url = self.state.settings_form.obs_url.clone();
        let result = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(url))
            .map_err(|e| ConsoleError::Clipboard(e.to_string()));
        match result {
            Ok(()) => self.succeed("URL copied to clipboard"),
            Err(e) => self.fail("Failed to copy URL", e),
        }
    }

    // ==================== Timers ====================

    /// Fire due deadlines and drain the recorder
    pub async fn tick(&mut self, now: Instant) {
        self.state.toasts.prune(now);

        if self.state.settings_form.take_due(now) {
            self.save_settings(true).await;
        }

        if let Some((at, port)) = self.state.redirect_at {
            if now >= at {
                self.state.redirect_at = None;
                self.redirect(port).await;
            }
        }

        if let Some(at) = self.state.reload_at {
            if now >= at {
                self.full_reload().await;
            }
        }

        self.state.recorder.pump();
    }
}

async fn read_config_file(path: &Path) -> Result<serde_json::Value> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

/// File paths from a terminal paste. Terminals paste dropped files as
/// whitespace separated, optionally quoted or `file://` prefixed paths.
pub fn parse_dropped_paths(pasted: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = pasted.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quote) {
            // `\` escapes only a space or quote; elsewhere it is a Windows separator
            ('\\', None) => match chars.peek() {
                Some(&next) if next.is_whitespace() || next == '\'' || next == '"' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            ('\'' | '"', None) => quote = Some(c),
            (q, Some(open)) if q == open => quote = None,
            (c, None) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
            }
            (c, _) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(current);
    }

    paths
        .into_iter()
        .map(|p| match p.strip_prefix("file://") {
            Some(uri) => urlencoding::decode(uri)
                .map(|decoded| PathBuf::from(decoded.as_ref()))
                .unwrap_or_else(|_| PathBuf::from(uri)),
            None => PathBuf::from(p),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dropped_paths() {
        let pasted = "/tmp/a.png '/tmp/with space.gif' /tmp/escaped\\ name.jpg\nfile:///tmp/b%20c.webp";
        assert_eq!(
            parse_dropped_paths(pasted),
            vec![
                PathBuf::from("/tmp/a.png"),
                PathBuf::from("/tmp/with space.gif"),
                PathBuf::from("/tmp/escaped name.jpg"),
                PathBuf::from("/tmp/b c.webp"),
            ]
        );
        assert!(parse_dropped_paths("   \n").is_empty());
    }

    #[test]
    fn test_parse_dropped_windows_paths() {
        assert_eq!(
            parse_dropped_paths(r"C:\Users\me\Pictures\bg.png"),
            vec![PathBuf::from(r"C:\Users\me\Pictures\bg.png")]
        );
        assert_eq!(
            parse_dropped_paths(r#""C:\Users\me\My Pictures\a.gif" D:\b.png"#),
            vec![
                PathBuf::from(r"C:\Users\me\My Pictures\a.gif"),
                PathBuf::from(r"D:\b.png"),
            ]
        );
    }
}
