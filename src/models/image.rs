//! Uploaded image assets and the `assets/` path convention

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix under which the backend serves uploaded images
pub const IMAGES_PREFIX: &str = "assets/";

/// An image in the backend's asset library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub filename: String,
    pub path: String,
    /// Total animation length in milliseconds (GIFs only)
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

impl ImageAsset {
    pub fn display_name(&self) -> &str {
        remove_images_prefix(&self.filename)
    }

    /// Picker / select label, e.g. `wave.gif (1200ms)`
    pub fn label(&self) -> String {
        match self.duration {
            Some(ms) => format!("{} ({}ms)", self.display_name(), ms),
            None => self.display_name().to_string(),
        }
    }
}

/// Response of `POST /api/images/upload`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub filename: String,
    pub path: String,
    #[serde(default)]
    pub duration: Option<u64>,
}

/// A local file staged for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_path(path)
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

/// Strip one leading `assets/` for display
pub fn remove_images_prefix(path: &str) -> &str {
    path.strip_prefix(IMAGES_PREFIX).unwrap_or(path)
}

/// Stored representation: exactly one leading `assets/`. Empty stays empty.
pub fn add_images_prefix(path: &str) -> String {
    let mut bare = path;
    while let Some(rest) = bare.strip_prefix(IMAGES_PREFIX) {
        bare = rest;
    }
    if bare.is_empty() {
        String::new()
    } else {
        format!("{}{}", IMAGES_PREFIX, bare)
    }
}

/// MIME type derived from the file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

pub fn is_image_path(path: &Path) -> bool {
    mime_for_path(path).is_some_and(|mime| mime.starts_with("image/"))
}
