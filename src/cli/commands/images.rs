//! Image library commands: `images`, `upload`, `delete-image`

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::api::Backend;
use crate::models::{UploadFile, is_image_path, remove_images_prefix};

pub async fn execute_images_command(backend: &impl Backend) -> Result<()> {
    let images = backend.images().await?;

    if images.is_empty() {
        println!("⚠️  No images uploaded");
        return Ok(());
    }

    println!("🖼️  Images ({}):", images.len());
    for image in &images {
        match image.size {
            Some(size) => println!("  {}  {} KiB", image.label(), size.div_ceil(1024)),
            None => println!("  {}", image.label()),
        }
    }
    Ok(())
}

/// Upload files one by one; a failed file does not stop the batch
pub async fn execute_upload_command(backend: &impl Backend, files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for path in files {
        if !is_image_path(path) {
            log::warn!("{} does not look like an image, uploading anyway", path.display());
        }
        let result = match UploadFile::from_path(path).await {
            Ok(file) => backend.upload_image(file).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(uploaded) => println!("✅ Uploaded: {}", remove_images_prefix(&uploaded.filename)),
            Err(e) => {
                failed += 1;
                println!("❌ Failed to upload {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} upload(s) failed", failed, files.len());
    }
    Ok(())
}

pub async fn execute_delete_image_command(backend: &impl Backend, name: &str) -> Result<()> {
    let filename = remove_images_prefix(name);
    backend.delete_image(filename).await?;
    println!("🗑️  Deleted: {}", filename);
    Ok(())
}
