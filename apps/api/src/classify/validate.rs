//! Response validator — treats the provider's completion as untrusted text.
//!
//! The raw output must parse strictly as JSON (no markdown fences, no prose),
//! carry exactly the fields the requested flow allows, and every tag must be
//! a case-sensitive member of its category's allowed set within the
//! category's selection bounds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::taxonomy::TagCategory;

/// The validated classification, returned to the caller unchanged.
/// `gender` is present only when the request used the gender flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub style_tags: Vec<String>,
    pub fitting_tags: Vec<String>,
    pub activity_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Validates the raw completion text for the given flow.
///
/// Failure taxonomy:
/// - not parseable as JSON → `MalformedResponse` (raw text kept for logging)
/// - wrong/missing/unexpected fields or wrong-typed values → `SchemaViolation`
/// - out-of-taxonomy value or list length out of bounds → `TaxonomyViolation`
pub fn validate_completion(raw: &str, gender_flow: bool) -> Result<ClassificationResult, AppError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|_| AppError::MalformedResponse(raw.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| AppError::SchemaViolation("expected a JSON object".to_string()))?;

    // Unexpected fields are rejected, not dropped: a `gender` outside the
    // gender flow (or any invented field) signals provider drift.
    for field in object.keys() {
        let expected = TagCategory::LIST_CATEGORIES
            .iter()
            .any(|c| c.field_name() == field)
            || (gender_flow && field == TagCategory::Gender.field_name());
        if !expected {
            return Err(AppError::SchemaViolation(format!(
                "unexpected field `{field}`"
            )));
        }
    }

    let style_tags = extract_tag_list(object, TagCategory::Style)?;
    let fitting_tags = extract_tag_list(object, TagCategory::Fitting)?;
    let activity_tags = extract_tag_list(object, TagCategory::Activity)?;
    let gender = if gender_flow {
        Some(extract_gender(object)?)
    } else {
        None
    };

    check_tag_list(TagCategory::Style, &style_tags)?;
    check_tag_list(TagCategory::Fitting, &fitting_tags)?;
    check_tag_list(TagCategory::Activity, &activity_tags)?;
    if let Some(gender) = &gender {
        if !TagCategory::Gender.allows(gender) {
            return Err(AppError::TaxonomyViolation(format!(
                "`gender`: `{gender}` is not an allowed value"
            )));
        }
    }

    Ok(ClassificationResult {
        style_tags,
        fitting_tags,
        activity_tags,
        gender,
    })
}

fn extract_tag_list(
    object: &serde_json::Map<String, Value>,
    category: TagCategory,
) -> Result<Vec<String>, AppError> {
    let field = category.field_name();
    let value = object
        .get(field)
        .ok_or_else(|| AppError::SchemaViolation(format!("missing field `{field}`")))?;
    let entries = value
        .as_array()
        .ok_or_else(|| AppError::SchemaViolation(format!("`{field}` must be an array")))?;

    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| AppError::SchemaViolation(format!("`{field}` entries must be strings")))
        })
        .collect()
}

fn extract_gender(object: &serde_json::Map<String, Value>) -> Result<String, AppError> {
    let field = TagCategory::Gender.field_name();
    let value = object
        .get(field)
        .ok_or_else(|| AppError::SchemaViolation(format!("missing field `{field}`")))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::SchemaViolation(format!("`{field}` must be a string")))
}

fn check_tag_list(category: TagCategory, values: &[String]) -> Result<(), AppError> {
    let field = category.field_name();
    let (min, max) = (category.min(), category.max());
    if values.len() < min || values.len() > max {
        return Err(AppError::TaxonomyViolation(format!(
            "`{field}` must contain {min} to {max} tags, got {}",
            values.len()
        )));
    }
    for value in values {
        if !category.allows(value) {
            return Err(AppError::TaxonomyViolation(format!(
                "`{field}`: `{value}` is not an allowed value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_non_gender_response_unchanged() {
        let raw = r#"{"style_tags":["Relaxed & Effortless"],"fitting_tags":["Oversized"],"activity_tags":["Weekend Casual"]}"#;
        let result = validate_completion(raw, false).unwrap();
        assert_eq!(result.style_tags, vec!["Relaxed & Effortless"]);
        assert_eq!(result.fitting_tags, vec!["Oversized"]);
        assert_eq!(result.activity_tags, vec!["Weekend Casual"]);
        assert_eq!(result.gender, None);
    }

    #[test]
    fn test_accepts_valid_gender_response() {
        let raw = r#"{
            "style_tags": ["Minimal & Modern", "Relaxed & Effortless"],
            "fitting_tags": ["Tailored"],
            "activity_tags": ["Work / Office", "Weekend Casual"],
            "gender": "Female"
        }"#;
        let result = validate_completion(raw, true).unwrap();
        assert_eq!(result.gender.as_deref(), Some("Female"));
        assert_eq!(result.style_tags.len(), 2);
    }

    #[test]
    fn test_markdown_fenced_output_is_malformed() {
        let raw = "```json\n{\"style_tags\":[\"Tailored\"]}\n```";
        let result = validate_completion(raw, false);
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_prose_output_is_malformed() {
        let raw = "Sure! Here are the tags: {\"style_tags\": []}";
        let result = validate_completion(raw, false);
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_output_is_malformed() {
        assert!(matches!(
            validate_completion("", false),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_object_json_is_schema_violation() {
        let result = validate_completion(r#"["Tailored"]"#, false);
        assert!(matches!(result, Err(AppError::SchemaViolation(_))));
    }

    #[test]
    fn test_missing_field_is_schema_violation() {
        let raw = r#"{"style_tags":["Tailored"],"fitting_tags":["Tailored"]}"#;
        let result = validate_completion(raw, false);
        match result {
            Err(AppError::SchemaViolation(msg)) => assert!(msg.contains("activity_tags")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_gender_missing_in_gender_flow_is_schema_violation() {
        let raw = r#"{"style_tags":["Minimal & Modern"],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        let result = validate_completion(raw, true);
        match result {
            Err(AppError::SchemaViolation(msg)) => assert!(msg.contains("gender")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_gender_present_outside_gender_flow_is_schema_violation() {
        let raw = r#"{
            "style_tags": ["Minimal & Modern"],
            "fitting_tags": ["Flowy"],
            "activity_tags": ["Weekend Casual"],
            "gender": "Female"
        }"#;
        let result = validate_completion(raw, false);
        match result {
            Err(AppError::SchemaViolation(msg)) => assert!(msg.contains("gender")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_extra_field_is_schema_violation() {
        let raw = r#"{
            "style_tags": ["Minimal & Modern"],
            "fitting_tags": ["Flowy"],
            "activity_tags": ["Weekend Casual"],
            "confidence": 0.9
        }"#;
        let result = validate_completion(raw, false);
        match result {
            Err(AppError::SchemaViolation(msg)) => assert!(msg.contains("confidence")),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_non_array_list_is_schema_violation() {
        let raw = r#"{"style_tags":"Minimal & Modern","fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        assert!(matches!(
            validate_completion(raw, false),
            Err(AppError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_non_string_entry_is_schema_violation() {
        let raw = r#"{"style_tags":[42],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        assert!(matches!(
            validate_completion(raw, false),
            Err(AppError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_too_many_valid_tags_is_taxonomy_violation() {
        // All three values are individually valid; the count is not.
        let raw = r#"{
            "style_tags": ["Minimal & Modern", "Romantic & Feminine", "Bold & Trend-Driven"],
            "fitting_tags": ["Flowy"],
            "activity_tags": ["Weekend Casual"]
        }"#;
        let result = validate_completion(raw, false);
        match result {
            Err(AppError::TaxonomyViolation(msg)) => {
                assert!(msg.contains("style_tags"));
                assert!(msg.contains("got 3"));
            }
            other => panic!("expected TaxonomyViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_is_taxonomy_violation() {
        let raw = r#"{"style_tags":[],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        assert!(matches!(
            validate_completion(raw, false),
            Err(AppError::TaxonomyViolation(_))
        ));
    }

    #[test]
    fn test_out_of_taxonomy_value_names_category_and_value() {
        let raw = r#"{"style_tags":["Grunge"],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        let result = validate_completion(raw, false);
        match result {
            Err(AppError::TaxonomyViolation(msg)) => {
                assert!(msg.contains("style_tags"));
                assert!(msg.contains("Grunge"));
            }
            other => panic!("expected TaxonomyViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_membership_check_is_case_sensitive() {
        let raw = r#"{"style_tags":["minimal & modern"],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        assert!(matches!(
            validate_completion(raw, false),
            Err(AppError::TaxonomyViolation(_))
        ));
    }

    #[test]
    fn test_unknown_gender_value_is_taxonomy_violation() {
        let raw = r#"{
            "style_tags": ["Minimal & Modern"],
            "fitting_tags": ["Flowy"],
            "activity_tags": ["Weekend Casual"],
            "gender": "Robot"
        }"#;
        let result = validate_completion(raw, true);
        match result {
            Err(AppError::TaxonomyViolation(msg)) => assert!(msg.contains("Robot")),
            other => panic!("expected TaxonomyViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_result_serializes_without_gender_when_absent() {
        let raw = r#"{"style_tags":["Minimal & Modern"],"fitting_tags":["Flowy"],"activity_tags":["Weekend Casual"]}"#;
        let result = validate_completion(raw, false).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("gender").is_none());
    }

    #[test]
    fn test_tag_order_is_preserved() {
        let raw = r#"{
            "style_tags": ["Relaxed & Effortless", "Minimal & Modern"],
            "fitting_tags": ["Oversized"],
            "activity_tags": ["Weekend Casual", "Lounge / At Home"]
        }"#;
        let result = validate_completion(raw, false).unwrap();
        assert_eq!(
            result.style_tags,
            vec!["Relaxed & Effortless", "Minimal & Modern"]
        );
    }
}
