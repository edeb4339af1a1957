//! Session domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::model::AnalysisResult;
use crate::intake::SelectedImage;

/// Where the current analysis stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Success,
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Success => "success",
            AnalysisStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a front end needs to render one analysis.
///
/// Only ever changed through [`Session::reduce`]. `result` is set exactly
/// when `status` is `Success`, `error` exactly when it is `Error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub image: Option<SelectedImage>,
    pub status: AnalysisStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    /// Incremented for every accepted analysis request; never reset.
    pub attempt: u64,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Inputs to the session reducer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A valid image was chosen; replaces any previous image and result.
    ImageSelected(SelectedImage),
    /// The user asked for the current image to be analyzed.
    AnalyzeRequested,
    AnalysisSucceeded {
        attempt: u64,
        result: AnalysisResult,
    },
    AnalysisFailed {
        attempt: u64,
        message: String,
    },
    /// Start over from an empty session.
    Reset,
}
