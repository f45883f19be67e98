//! Metafield payload builder — deterministic transformation of a tag mapping
//! into typed, namespaced upsert records.
//!
//! Taxonomy-agnostic by design: whatever keys the caller accumulated are
//! passed through, one record per mapping entry, in input order. `serde_json`
//! is built with `preserve_order`, so the mapping iterates in document order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accumulated profile data for one customer: category key → scalar or list.
pub type TagMapping = serde_json::Map<String, Value>;

/// The one key that maps to a scalar metafield instead of a list.
const GENDER_KEY: &str = "gender";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetafieldNamespace {
    Custom,
    Persona,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetafieldType {
    #[serde(rename = "single_line_text_field")]
    SingleLineTextField,
    #[serde(rename = "list.single_line_text_field")]
    ListSingleLineTextField,
}

/// A typed, namespaced key/value record upserted to the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetafieldRecord {
    pub namespace: MetafieldNamespace,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: MetafieldType,
    pub value: String,
}

/// Builds one record per mapping entry, in input iteration order.
///
/// - key `gender` → `custom` / `single_line_text_field`, scalar coerced to text
/// - any other key → `persona` / `list.single_line_text_field`, value encoded
///   as a JSON array of strings (scalars wrapped into a one-element list)
pub fn build_metafields(mapping: &TagMapping) -> Vec<MetafieldRecord> {
    mapping
        .iter()
        .map(|(key, value)| {
            if key == GENDER_KEY {
                MetafieldRecord {
                    namespace: MetafieldNamespace::Custom,
                    key: key.clone(),
                    value_type: MetafieldType::SingleLineTextField,
                    value: scalar_text(value),
                }
            } else {
                let items = string_list(value).into_iter().map(Value::String).collect();
                MetafieldRecord {
                    namespace: MetafieldNamespace::Persona,
                    key: key.clone(),
                    value_type: MetafieldType::ListSingleLineTextField,
                    value: Value::Array(items).to_string(),
                }
            }
        })
        .collect()
}

/// Coerces a JSON scalar to plain text: strings unquoted, everything else in
/// its JSON rendering.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    }
}
