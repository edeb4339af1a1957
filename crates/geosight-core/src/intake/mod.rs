//! Image intake.
//!
//! Validates a user-selected file and turns it into a base64 payload plus a
//! data URL preview. No resizing or re-encoding is performed.

pub mod model;

use std::path::Path;

use base64::Engine;
use tracing::debug;

use crate::error::{GeoError, GeoResult};

pub use model::{ImageFile, SelectedImage};

/// Media type used when the extension is not recognized.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Validate a file and prepare it for preview and analysis.
pub fn select_image(file: ImageFile) -> GeoResult<SelectedImage> {
    let mime_type = normalize_media_type(&file.mime_type);
    if !is_image_media_type(&mime_type) {
        return Err(GeoError::invalid_input(format!(
            "'{}' is not an image (media type '{}')",
            file.name, file.mime_type
        )));
    }
    if file.bytes.is_empty() {
        return Err(GeoError::invalid_input(format!("'{}' is empty", file.name)));
    }

    let base64_payload = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
    let preview_data_url = format!("data:{};base64,{}", mime_type, base64_payload);
    debug!(name = %file.name, mime_type = %mime_type, size = file.bytes.len(), "Image selected");

    Ok(SelectedImage {
        file_name: file.name,
        mime_type,
        base64_payload,
        preview_data_url,
        size_bytes: file.bytes.len(),
    })
}

impl ImageFile {
    /// Read a file from disk, inferring its media type from the extension.
    pub fn from_path(path: &Path) -> GeoResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self::new(name, detect_media_type_from_path(path), bytes))
    }
}

/// Whether a normalized media type denotes an image.
pub fn is_image_media_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Drop parameters and normalize case, e.g. `Image/JPEG; q=1` -> `image/jpeg`.
pub fn normalize_media_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or(raw).trim().to_ascii_lowercase()
}

/// Detect media type from a file extension.
pub fn detect_media_type_from_path(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => UNKNOWN_MEDIA_TYPE,
    }
    .to_string()
}
