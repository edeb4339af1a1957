//! Parsing of the model's text payload into an [`AnalysisResult`].

use crate::error::{GeoError, GeoResult};

use super::model::AnalysisResult;

/// Parse the text returned by the model.
///
/// Blank text is [`GeoError::EmptyResponse`]; anything that does not match
/// the result shape, including a missing required key, is
/// [`GeoError::MalformedResponse`]. Coordinates are not sanitized here.
pub fn parse_result(text: &str) -> GeoResult<AnalysisResult> {
    if text.trim().is_empty() {
        return Err(GeoError::EmptyResponse);
    }

    let json_str = extract_json(text);
    let result = serde_json::from_str(json_str)?;
    Ok(result)
}

/// Extract JSON from a string that might be wrapped in markdown code blocks.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed;
    }

    // ```json ... ```
    if let Some(start) = trimmed.find("```json") {
        let after_marker = &trimmed[start + 7..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim();
        }
    }

    // ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_marker = &trimmed[start + 3..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::ResultField;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn paris() -> Value {
        json!({
            "thoughtProcess": "Plane trees, Haussmann facades, French signage.",
            "visualCues": ["French road signage", "Plane trees"],
            "country": "France",
            "region": "Île-de-France",
            "latitude": 48.85,
            "longitude": 2.35,
            "explanation": "Classic central Paris boulevard.",
            "confidence": 87
        })
    }

    #[test]
    fn test_parse_full_result() {
        let result = parse_result(&paris().to_string()).unwrap();

        assert_eq!(result.country, "France");
        assert_eq!(result.region.as_deref(), Some("Île-de-France"));
        assert_eq!(result.latitude, 48.85);
        assert_eq!(result.longitude, 2.35);
        assert_eq!(result.confidence, 87.0);
        assert_eq!(result.visual_cues, vec!["French road signage", "Plane trees"]);
    }

    #[test]
    fn test_region_optional() {
        let mut value = paris();
        value.as_object_mut().unwrap().remove("region");

        let result = parse_result(&value.to_string()).unwrap();
        assert!(result.region.is_none());
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(parse_result(""), Err(GeoError::EmptyResponse)));
        assert!(matches!(parse_result("  \n"), Err(GeoError::EmptyResponse)));
    }

    #[test]
    fn test_not_json() {
        let err = parse_result("I think this is Portugal.").unwrap_err();
        assert!(matches!(err, GeoError::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let mut value = paris();
        value["visualCues"] = json!("just a string");
        let err = parse_result(&value.to_string()).unwrap_err();
        assert!(matches!(err, GeoError::MalformedResponse(_)));
    }

    #[test]
    fn test_fenced_json() {
        let text = format!("Here you go:\n```json\n{}\n```", paris());
        let result = parse_result(&text).unwrap();
        assert_eq!(result.country, "France");
    }

    #[test]
    fn test_backticks_inside_thought_process() {
        let mut value = paris();
        value["thoughtProcess"] = json!("The sign reads ```RUE``` in caps.");
        let result = parse_result(&value.to_string()).unwrap();
        assert_eq!(result.thought_process, "The sign reads ```RUE``` in caps.");
    }

    #[test]
    fn test_extract_json_braces() {
        assert_eq!(extract_json("Answer: {\"a\": 1} done"), "{\"a\": 1}");
        assert_eq!(extract_json("no json here"), "no json here");
    }

    proptest! {
        #[test]
        fn prop_missing_required_key_is_malformed(index in 0..ResultField::ORDERED.len()) {
            let field = ResultField::ORDERED[index];
            let mut value = paris();
            value.as_object_mut().unwrap().remove(field.name());

            let parsed = parse_result(&value.to_string());
            if field.is_required() {
                prop_assert!(matches!(parsed, Err(GeoError::MalformedResponse(_))));
            } else {
                prop_assert!(parsed.is_ok());
            }
        }
    }
}
