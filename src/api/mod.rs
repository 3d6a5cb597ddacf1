//! Keybrame server REST API
//!
//! The [`Backend`] trait is the seam between the console controller and the
//! HTTP transport; [`KeybrameClient`] is the reqwest implementation.

pub mod client;

pub use client::KeybrameClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::models::{
    CreatedKeybinding, ImageAsset, Keybinding, KeybindingPayload, Settings, SettingsSaveResponse,
    SettingsUpdate, UploadFile, UploadedImage, VersionInfo,
};

#[async_trait]
pub trait Backend: Send + Sync {
    /// Base URL currently targeted, e.g. `http://localhost:5000`
    fn base_url(&self) -> String;

    /// Point the backend at the same host on another port
    fn rebase(&mut self, port: u16) -> Result<()>;

    /// GET /api/version
    async fn version(&self) -> Result<VersionInfo>;

    /// GET /api/settings
    async fn settings(&self) -> Result<Settings>;

    /// PUT /api/settings
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<SettingsSaveResponse>;

    /// GET /api/keybindings
    async fn keybindings(&self) -> Result<Vec<Keybinding>>;

    /// POST /api/keybindings
    async fn create_keybinding(&self, payload: &KeybindingPayload) -> Result<CreatedKeybinding>;

    /// PUT /api/keybindings/:id
    async fn update_keybinding(&self, id: i64, payload: &KeybindingPayload) -> Result<()>;

    /// DELETE /api/keybindings/:id
    async fn delete_keybinding(&self, id: i64) -> Result<()>;

    /// PUT /api/keybindings/reorder
    async fn reorder_keybindings(&self, order: &[i64]) -> Result<()>;

    /// GET /api/images
    async fn images(&self) -> Result<Vec<ImageAsset>>;

    /// POST /api/images/upload
    async fn upload_image(&self, file: UploadFile) -> Result<UploadedImage>;

    /// DELETE /api/images/:filename
    async fn delete_image(&self, filename: &str) -> Result<()>;

    /// POST /api/reload
    async fn reload(&self) -> Result<()>;

    /// GET /api/export
    async fn export_config(&self) -> Result<Value>;

    /// POST /api/import
    async fn import_config(&self, config: &Value) -> Result<()>;

    /// POST /api/server/restart
    async fn restart_server(&self) -> Result<()>;

    /// POST /api/server/shutdown
    async fn shutdown_server(&self) -> Result<()>;

    /// POST /api/server/update
    async fn install_update(&self) -> Result<()>;
}
