use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::errors::{AppError, AppResult};

pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

const ALLOWED_MIME_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

static DATA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+);base64,(?P<payload>[A-Za-z0-9+/=\s]+)$")
        .expect("data URI pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    SubMaterials,
    Questions,
}

impl UploadCategory {
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadCategory::SubMaterials => "sub-materials",
            UploadCategory::Questions => "questions",
        }
    }
}

/// A decoded `data:<mime>;base64,<payload>` image.
#[derive(Debug)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

pub fn decode_data_uri(value: &str) -> AppResult<DecodedImage> {
    let captures = DATA_URI
        .captures(value.trim())
        .ok_or_else(|| AppError::ValidationError("Invalid data URI".to_string()))?;

    let mime = captures["mime"].to_ascii_lowercase();
    let extension = ALLOWED_MIME_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::ValidationError(format!("Unsupported file type '{}'", mime))
        })?;

    let payload: String = captures["payload"]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| AppError::ValidationError("Invalid base64 payload".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::ValidationError(format!(
            "File exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    Ok(DecodedImage { extension, bytes })
}

pub struct UploadService {
    root: PathBuf,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stores a data URI image and returns its public `/uploads/...` path.
    pub async fn store(&self, data_uri: &str, category: UploadCategory) -> AppResult<String> {
        let image = decode_data_uri(data_uri)?;

        let digest = Sha256::digest(&image.bytes);
        let hash: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
        let file_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            hash,
            image.extension
        );

        let dir = self.root.join(category.dir_name());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        log::info!(
            "Stored {} byte upload as {}/{}",
            image.bytes.len(),
            category.dir_name(),
            file_name
        );
        Ok(format!("/uploads/{}/{}", category.dir_name(), file_name))
    }

    /// Stores `value` when it is a data URI, otherwise hands it back untouched.
    pub async fn store_if_data_uri(
        &self,
        value: String,
        category: UploadCategory,
    ) -> AppResult<String> {
        if is_data_uri(&value) {
            self.store(&value, category).await
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_decode_png_data_uri() {
        let image = decode_data_uri(&format!("data:image/png;base64,{}", PNG)).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_rejects_unsupported_mime() {
        let result = decode_data_uri(&format!("data:application/pdf;base64,{}", PNG));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes));
        let err = decode_data_uri(&uri).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_store_writes_file_under_category() {
        let root = std::env::temp_dir().join(format!("elearn-upload-{}", uuid::Uuid::new_v4()));
        let service = UploadService::new(&root);

        let path = service
            .store(&format!("data:image/png;base64,{}", PNG), UploadCategory::Questions)
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/questions/"));
        assert!(path.ends_with(".png"));
        let file_name = path.rsplit('/').next().unwrap();
        assert!(root.join("questions").join(file_name).exists());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_store_if_data_uri_passes_urls_through() {
        let service = UploadService::new(std::env::temp_dir());
        let url = "https://youtu.be/abc".to_string();
        let stored = service
            .store_if_data_uri(url.clone(), UploadCategory::SubMaterials)
            .await
            .unwrap();
        assert_eq!(stored, url);
    }
}
