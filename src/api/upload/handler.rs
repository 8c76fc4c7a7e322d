//! Image Upload Handler
//!
//! Accepts product images from the back office. Uploads are validated by
//! extension, size and decodability, then re-encoded to JPEG so stored
//! files are uniform regardless of the source format.

use std::fs;
use std::io::Cursor;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored product images
const JPEG_QUALITY: u8 = 85;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
}

/// POST /api/upload - store a product image
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let ext = original_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let data = field.bytes().await?;
        validate_image(&data, &ext)?;

        let jpeg = reencode_jpeg(&data)?;
        let file_id = content_hash(&jpeg);
        let filename = format!("{}.jpg", Uuid::new_v4());

        let uploads_dir = state.config.uploads_dir();
        fs::create_dir_all(&uploads_dir)
            .map_err(|e| AppError::internal(format!("Failed to create uploads dir: {}", e)))?;
        let path = uploads_dir.join(&filename);
        fs::write(&path, &jpeg)
            .map_err(|e| AppError::internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(
            filename = %filename,
            original = %original_name,
            size = jpeg.len(),
            "Image uploaded"
        );

        return Ok(Json(UploadResponse {
            file_id,
            url: format!("/uploads/{}", filename),
            filename,
            original_name,
            size: jpeg.len(),
            format: "jpg".to_string(),
        }));
    }

    Err(AppError::validation("Missing 'image' field".to_string()))
}

/// Validate size and extension before decoding
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty upload".to_string()));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    let guessed = mime_guess::from_ext(ext).first_or_octet_stream();
    if guessed.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::validation(format!(
            "'{}' does not map to an image content type",
            ext
        )));
    }
    Ok(())
}

/// Decode and re-encode as JPEG
fn reencode_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_uploads_are_rejected() {
        let data = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(validate_image(&data, "jpg").is_err());
    }

    #[test]
    fn extension_allowlist() {
        let data = vec![0u8; 16];
        assert!(validate_image(&data, "png").is_ok());
        assert!(validate_image(&data, "webp").is_ok());
        assert!(validate_image(&data, "gif").is_err());
        assert!(validate_image(&data, "pdf").is_err());
        assert!(validate_image(&data, "").is_err());
    }

    #[test]
    fn garbage_bytes_fail_decoding() {
        assert!(reencode_jpeg(b"definitely not an image").is_err());
    }

    #[test]
    fn content_hash_is_hex_sha256() {
        let hash = content_hash(b"abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
