//! In-memory Keybrame backend for console workflow tests
//!
//! Holds the server-side data set behind a mutex and records every mutating
//! call, so tests can assert both on what the console shows and on what it
//! sent.

#![allow(dead_code)]

use async_trait::async_trait;
use keybrame_console::api::Backend;
use keybrame_console::errors::{ConsoleError, Result};
use keybrame_console::models::*;
use serde_json::{Value, json};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ServerData {
    pub port: u16,
    pub settings: Settings,
    pub keybindings: Vec<Keybinding>,
    pub images: Vec<ImageAsset>,
    pub imported: Option<Value>,
    pub last_payload: Option<KeybindingPayload>,
    pub calls: Vec<String>,
    pub next_id: i64,
}

/// Failure switches for error-path tests
#[derive(Debug, Default, Clone, Copy)]
pub struct MockErrorInjection {
    pub fail_reorder: bool,
    pub fail_restart: bool,
    pub reload_required: bool,
}

pub struct MemoryBackend {
    pub data: Mutex<ServerData>,
    pub errors: MockErrorInjection,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_errors(MockErrorInjection::default())
    }

    pub fn with_errors(errors: MockErrorInjection) -> Self {
        let data = ServerData {
            port: 5000,
            settings: Settings {
                port: Some(5000),
                default_image: "assets/idle.png".into(),
                shutdown_combo: None,
            },
            next_id: 100,
            ..Default::default()
        };
        Self {
            data: Mutex::new(data),
            errors,
        }
    }

    pub fn seed_keybindings(&self, keybindings: Vec<Keybinding>) {
        self.data.lock().unwrap().keybindings = keybindings;
    }

    pub fn seed_images(&self, names: &[&str]) {
        self.data.lock().unwrap().images = names.iter().map(|name| image(name)).collect();
    }

    pub fn calls(&self) -> Vec<String> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.data.lock().unwrap().calls.clear();
    }

    pub fn server_order(&self) -> Vec<i64> {
        self.data
            .lock()
            .unwrap()
            .keybindings
            .iter()
            .map(|kb| kb.id)
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.data.lock().unwrap().calls.push(call.into());
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn base_url(&self) -> String {
        format!("http://localhost:{}", self.data.lock().unwrap().port)
    }

    fn rebase(&mut self, port: u16) -> Result<()> {
        let data = self.data.get_mut().unwrap();
        data.port = port;
        data.calls.push(format!("rebase {}", port));
        Ok(())
    }

    async fn version(&self) -> Result<VersionInfo> {
        Ok(VersionInfo {
            version: "2.1.0".into(),
        })
    }

    async fn settings(&self) -> Result<Settings> {
        Ok(self.data.lock().unwrap().settings.clone())
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<SettingsSaveResponse> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!(
            "update_settings {} {}",
            update.port, update.default_image
        ));
        let changed = data.settings.port != Some(update.port);
        data.settings.port = Some(update.port);
        data.settings.default_image = update.default_image.clone();
        Ok(SettingsSaveResponse {
            success: true,
            reload_required: changed && self.errors.reload_required,
        })
    }

    async fn keybindings(&self) -> Result<Vec<Keybinding>> {
        Ok(self.data.lock().unwrap().keybindings.clone())
    }

    async fn create_keybinding(&self, payload: &KeybindingPayload) -> Result<CreatedKeybinding> {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id;
        data.next_id += 1;
        data.calls.push("create_keybinding".into());
        data.last_payload = Some(payload.clone());
        let keybinding = Keybinding {
            id,
            keys: payload.keys.clone(),
            binding_type: payload.binding_type,
            image: payload.image.clone(),
            description: Some(payload.description.clone()),
            transition_in: payload.transition_in.clone().flatten(),
            transition_out: payload.transition_out.clone().flatten(),
            priority: None,
            enabled: true,
        };
        data.keybindings.push(keybinding);
        Ok(CreatedKeybinding {
            success: true,
            id: Some(id),
        })
    }

    async fn update_keybinding(&self, id: i64, payload: &KeybindingPayload) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!("update_keybinding {}", id));
        data.last_payload = Some(payload.clone());
        let keybinding = data
            .keybindings
            .iter_mut()
            .find(|kb| kb.id == id)
            .ok_or_else(|| ConsoleError::Api {
                status: 404,
                message: "Keybinding not found".into(),
            })?;
        keybinding.keys = payload.keys.clone();
        keybinding.image = payload.image.clone();
        Ok(())
    }

    async fn delete_keybinding(&self, id: i64) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!("delete_keybinding {}", id));
        data.keybindings.retain(|kb| kb.id != id);
        Ok(())
    }

    async fn reorder_keybindings(&self, order: &[i64]) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!("reorder {:?}", order));
        if self.errors.fail_reorder {
            return Err(ConsoleError::Api {
                status: 500,
                message: "database is locked".into(),
            });
        }
        let mut sorted = Vec::with_capacity(order.len());
        for id in order {
            if let Some(kb) = data.keybindings.iter().find(|kb| kb.id == *id) {
                sorted.push(kb.clone());
            }
        }
        data.keybindings = sorted;
        Ok(())
    }

    async fn images(&self) -> Result<Vec<ImageAsset>> {
        Ok(self.data.lock().unwrap().images.clone())
    }

    async fn upload_image(&self, file: UploadFile) -> Result<UploadedImage> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!("upload {} {}", file.file_name, file.mime));
        data.images.push(image(&file.file_name));
        Ok(UploadedImage {
            path: format!("assets/{}", file.file_name),
            filename: file.file_name,
            duration: None,
        })
    }

    async fn delete_image(&self, filename: &str) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(format!("delete_image {}", filename));
        data.images.retain(|img| img.filename != filename);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.record("reload");
        Ok(())
    }

    async fn export_config(&self) -> Result<Value> {
        let mut data = self.data.lock().unwrap();
        data.calls.push("export".into());
        Ok(json!({
            "settings": data.settings,
            "keybindings": data.keybindings,
        }))
    }

    /// Replaces settings and keybindings wholesale, like the server does
    async fn import_config(&self, config: &Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.calls.push("import".into());
        data.imported = Some(config.clone());
        data.settings = serde_json::from_value(config["settings"].clone())?;
        data.keybindings = serde_json::from_value(config["keybindings"].clone())?;
        Ok(())
    }

    async fn restart_server(&self) -> Result<()> {
        self.record("restart");
        if self.errors.fail_restart {
            return Err(ConsoleError::Transport("connection reset by peer".into()));
        }
        Ok(())
    }

    async fn shutdown_server(&self) -> Result<()> {
        self.record("shutdown");
        Ok(())
    }

    async fn install_update(&self) -> Result<()> {
        self.record("install_update");
        Ok(())
    }
}

pub fn keybinding(id: i64, keys: &[&str], image: &str) -> Keybinding {
    Keybinding {
        id,
        keys: keys.iter().map(|k| k.to_string()).collect(),
        binding_type: BindingType::Toggle,
        image: format!("assets/{}", image),
        description: None,
        transition_in: None,
        transition_out: None,
        priority: Some(id),
        enabled: true,
    }
}

pub fn image(name: &str) -> ImageAsset {
    ImageAsset {
        filename: name.to_string(),
        path: format!("assets/{}", name),
        duration: None,
        size: Some(1024),
        image_type: None,
    }
}
