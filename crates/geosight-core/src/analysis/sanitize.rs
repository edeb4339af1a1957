//! Coordinate sanitization.

use tracing::warn;

use super::model::AnalysisResult;

/// Replace non-finite coordinates with `0.0`.
///
/// Never fails and is idempotent. Each replacement is logged as a
/// `CoordinateDefaulted` warning; all other fields pass through untouched.
pub fn sanitize(mut result: AnalysisResult) -> AnalysisResult {
    result.latitude = default_non_finite("latitude", result.latitude);
    result.longitude = default_non_finite("longitude", result.longitude);
    result
}

fn default_non_finite(axis: &str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(axis, value = %value, "CoordinateDefaulted: invalid {} received, defaulting to 0", axis);
        0.0
    }
}
