//! Analysis domain models.
//!
//! [`AnalysisRequest`] is what goes out to the model, [`AnalysisResult`] is
//! what comes back. Result field order mirrors the generation order the
//! response schema imposes on the model.

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::intake::{is_image_media_type, normalize_media_type};

/// A single image submitted for location analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    image_bytes: String,
    mime_type: String,
}

impl AnalysisRequest {
    /// Create a request from a base64 payload and its media type.
    ///
    /// The payload must decode to at least one byte and the media type must
    /// start with `image/`.
    pub fn new(image_bytes: impl Into<String>, mime_type: impl Into<String>) -> GeoResult<Self> {
        let image_bytes = image_bytes.into();
        let mime_type = normalize_media_type(&mime_type.into());

        if !is_image_media_type(&mime_type) {
            return Err(GeoError::invalid_input(format!(
                "media type '{}' is not an image",
                mime_type
            )));
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(image_bytes.as_bytes())
            .map_err(|e| GeoError::invalid_input(format!("image payload is not valid base64: {}", e)))?;
        if decoded.is_empty() {
            return Err(GeoError::invalid_input("image payload is empty"));
        }

        Ok(Self {
            image_bytes,
            mime_type,
        })
    }

    /// Build a request from parts already checked by intake.
    pub(crate) fn from_validated(image_bytes: String, mime_type: String) -> Self {
        Self {
            image_bytes,
            mime_type,
        }
    }

    /// Base64-encoded image data.
    pub fn image_bytes(&self) -> &str {
        &self.image_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Estimated origin of a photograph, as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub thought_process: String,
    pub visual_cues: Vec<String>,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_degrees")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient_degrees")]
    pub longitude: f64,
    pub explanation: String,
    /// Self-reported confidence, nominally 0-100. Not range checked.
    pub confidence: f64,
}

impl AnalysisResult {
    /// Region name, treating a blank string as absent.
    pub fn region_label(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Whether both coordinates can be placed on a map.
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Accept any JSON value for a coordinate; non-numbers become `NaN`.
///
/// The key itself stays required. Replacing `NaN` is the sanitizer's job.
fn lenient_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}
