//! Wire types for the document store API

use serde::{Deserialize, Serialize};

/// A collection definition submitted at creation time.
///
/// The schema is fully determined before any document is written and
/// cannot change for the lifetime of the collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub default_sorting_field: String,
    pub token_separators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols_to_index: Option<Vec<String>>,
}

/// A single field definition inside a [`CollectionSchema`].
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "is_false")]
    pub facet: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldSpec {
    fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            facet: false,
            optional: false,
            locale: None,
        }
    }

    /// A `string` field.
    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::new(name, "string")
    }

    /// A `string[]` field.
    #[must_use]
    pub fn string_array(name: &str) -> Self {
        Self::new(name, "string[]")
    }

    /// An `int64` field.
    #[must_use]
    pub fn int64(name: &str) -> Self {
        Self::new(name, "int64")
    }

    /// Mark the field as a facet.
    #[must_use]
    pub fn facet(mut self) -> Self {
        self.facet = true;
        self
    }

    /// Mark the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attach a locale to the field.
    #[must_use]
    pub fn locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }
}

/// Per-document outcome from a bulk import call.
///
/// The store answers one JSONL line per submitted document; failed lines
/// carry the store's error message and the rejected document payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Resolved alias target as returned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasTarget {
    pub collection_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_spec_serializes_only_set_flags() {
        let spec = FieldSpec::string("url").facet();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "url", "type": "string", "facet": true})
        );
    }

    #[test]
    fn localized_optional_field_carries_all_attributes() {
        let spec = FieldSpec::string_array("tags").facet().optional().locale("en");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "tags",
                "type": "string[]",
                "facet": true,
                "optional": true,
                "locale": "en"
            })
        );
    }

    #[test]
    fn schema_omits_symbols_to_index_when_unset() {
        let schema = CollectionSchema {
            name: "docs_123".to_string(),
            fields: vec![FieldSpec::int64("item_priority")],
            default_sorting_field: "item_priority".to_string(),
            token_separators: vec!["_".to_string(), "-".to_string()],
            symbols_to_index: None,
        };
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("symbols_to_index").is_none());
        assert_eq!(json["default_sorting_field"], "item_priority");
    }
}
