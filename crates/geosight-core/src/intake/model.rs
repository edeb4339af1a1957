//! Image intake domain model.

use serde::Serialize;

use crate::analysis::model::AnalysisRequest;

/// A file chosen by the user, before validation.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A validated image ready for preview and submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip_serializing)]
    pub base64_payload: String,
    pub preview_data_url: String,
    pub size_bytes: usize,
}

impl ImageFile {
    /// Create a file from raw parts.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl SelectedImage {
    /// Build the request consumed by the analysis client.
    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest::from_validated(self.base64_payload.clone(), self.mime_type.clone())
    }
}
