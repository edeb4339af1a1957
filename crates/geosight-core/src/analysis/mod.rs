//! Location analysis.
//!
//! Builds the request for a remote multimodal model, parses its structured
//! answer and sanitizes the coordinates.

pub mod gemini;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod sanitize;
pub mod schema;

use async_trait::async_trait;

use crate::error::GeoResult;

pub use gemini::GeminiClient;
pub use model::{AnalysisRequest, AnalysisResult};
pub use sanitize::sanitize;

/// Anything that can turn an image into a location estimate.
///
/// Implementations perform exactly one remote call per invocation and
/// return a sanitized result.
#[async_trait]
pub trait LocationAnalyzer: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> GeoResult<AnalysisResult>;
}
