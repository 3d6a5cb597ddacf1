//! reqwest-backed [`Backend`] implementation

use async_trait::async_trait;
use reqwest::{Client, Response, multipart};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::Backend;
use crate::errors::{ConsoleError, Result};
use crate::models::{
    CreatedKeybinding, ImageAsset, Keybinding, KeybindingPayload, ReorderRequest, Settings,
    SettingsSaveResponse, SettingsUpdate, UploadFile, UploadedImage, VersionInfo,
};

#[derive(Debug, Clone)]
pub struct KeybrameClient {
    http: Client,
    base: Url,
}

impl KeybrameClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(server_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConsoleError::Config(format!(
                "unsupported scheme '{}' in {}",
                base.scheme(),
                server_url
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConsoleError::from)?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Turn a non-2xx response into `ConsoleError::Api`
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::debug!("API error {}: {}", status, body);
        Err(ConsoleError::from_api_body(status.as_u16(), &body))
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        let response = self.http.post(self.endpoint(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for KeybrameClient {
    fn base_url(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }

    fn rebase(&mut self, port: u16) -> Result<()> {
        self.base
            .set_port(Some(port))
            .map_err(|_| ConsoleError::Config(format!("cannot set port on {}", self.base)))?;
        log::info!("Backend rebased to {}", self.base);
        Ok(())
    }

    async fn version(&self) -> Result<VersionInfo> {
        let response = self.http.get(self.endpoint("/api/version")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn settings(&self) -> Result<Settings> {
        let response = self.http.get(self.endpoint("/api/settings")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<SettingsSaveResponse> {
        let response = self
            .http
            .put(self.endpoint("/api/settings"))
            .json(update)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn keybindings(&self) -> Result<Vec<Keybinding>> {
        let response = self
            .http
            .get(self.endpoint("/api/keybindings"))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_keybinding(&self, payload: &KeybindingPayload) -> Result<CreatedKeybinding> {
        let response = self
            .http
            .post(self.endpoint("/api/keybindings"))
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_keybinding(&self, id: i64, payload: &KeybindingPayload) -> Result<()> {
        let response = self
            .http
            .put(self.endpoint(&format!("/api/keybindings/{}", id)))
            .json(payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_keybinding(&self, id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/api/keybindings/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn reorder_keybindings(&self, order: &[i64]) -> Result<()> {
        let body = ReorderRequest {
            order: order.to_vec(),
        };
        let response = self
            .http
            .put(self.endpoint("/api/keybindings/reorder"))
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn images(&self) -> Result<Vec<ImageAsset>> {
        let response = self.http.get(self.endpoint("/api/images")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn upload_image(&self, file: UploadFile) -> Result<UploadedImage> {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/api/images/upload"))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_image(&self, filename: &str) -> Result<()> {
        let path = format!("/api/images/{}", urlencoding::encode(filename));
        let response = self.http.delete(self.endpoint(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.post_empty("/api/reload").await
    }

    async fn export_config(&self) -> Result<Value> {
        let response = self.http.get(self.endpoint("/api/export")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn import_config(&self, config: &Value) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("/api/import"))
            .json(config)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn restart_server(&self) -> Result<()> {
        self.post_empty("/api/server/restart").await
    }

    async fn shutdown_server(&self) -> Result<()> {
        self.post_empty("/api/server/shutdown").await
    }

    async fn install_update(&self) -> Result<()> {
        self.post_empty("/api/server/update").await
    }
}
