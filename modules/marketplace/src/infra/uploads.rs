//! Local-filesystem image store for menu item uploads.

use std::path::PathBuf;

use uuid::Uuid;

use crate::config::UploadConfig;
use crate::domain::error::DomainError;

pub struct ImageStore {
    dir: PathBuf,
    max_size_bytes: u64,
    allowed_mime: Vec<String>,
}

impl ImageStore {
    #[must_use]
    pub fn new(cfg: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&cfg.dir),
            max_size_bytes: cfg.max_size_mb * 1024 * 1024,
            allowed_mime: cfg.allowed_mime.clone(),
        }
    }

    /// Validate and persist an uploaded image, returning its relative path.
    pub async fn save(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let mime: mime::Mime = content_type
            .parse()
            .map_err(|_| DomainError::validation("image", "invalid content type"))?;

        if !self.allowed_mime.iter().any(|m| m == mime.essence_str()) {
            return Err(DomainError::validation(
                "image",
                format!("content type '{}' is not allowed", mime.essence_str()),
            ));
        }
        if bytes.len() as u64 > self.max_size_bytes {
            return Err(DomainError::validation(
                "image",
                format!("exceeds maximum size of {} bytes", self.max_size_bytes),
            ));
        }

        let extension = match mime.essence_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "bin",
        };
        let file_name = format!("{}.{extension}", Uuid::now_v7());
        let path = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::internal(format!("image store: {e}")))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::internal(format!("image store: {e}")))?;

        Ok(file_name)
    }
}
