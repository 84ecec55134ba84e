//! Fixed collection schema for crawled documentation records
//!
//! The schema is identical for every collection the pipeline creates;
//! callers may only override token separators and indexed symbols.

use serde::Deserialize;

use crate::store::{CollectionSchema, FieldSpec};

use super::transform::HIERARCHY_LEVELS;

/// Token separators applied when the caller supplies none.
pub const DEFAULT_TOKEN_SEPARATORS: [&str; 2] = ["_", "-"];

/// Caller-supplied schema overrides, applied only when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexSettings {
    pub token_separators: Option<Vec<String>>,
    pub symbols_to_index: Option<Vec<String>>,
}

/// Build the full collection schema for a staging collection.
///
/// `item_priority` is the only non-optional numeric field and is
/// declared as the default sorting field, which is what makes the
/// transformer's priority score the store's ranking tiebreaker.
pub fn collection_schema(name: &str, locale: &str, settings: &IndexSettings) -> CollectionSchema {
    let mut fields = vec![
        FieldSpec::string("anchor").optional(),
        FieldSpec::string("content").locale(locale).optional(),
        FieldSpec::string("url").facet(),
        FieldSpec::string("url_without_anchor").facet().optional(),
        FieldSpec::string_array("version").facet().optional(),
    ];
    for level in 0..HIERARCHY_LEVELS {
        fields.push(
            FieldSpec::string(&format!("hierarchy.lvl{level}"))
                .facet()
                .locale(locale)
                .optional(),
        );
    }
    fields.extend([
        FieldSpec::string("type").facet().locale(locale).optional(),
        // wildcard entry covering any crawler-emitted *_tag field
        FieldSpec::string(".*_tag").facet().locale(locale).optional(),
        FieldSpec::string("language").facet().optional(),
        FieldSpec::string_array("tags").facet().locale(locale).optional(),
        FieldSpec::int64("item_priority"),
    ]);

    let token_separators = settings.token_separators.clone().unwrap_or_else(|| {
        DEFAULT_TOKEN_SEPARATORS
            .iter()
            .map(ToString::to_string)
            .collect()
    });

    CollectionSchema {
        name: name.to_string(),
        fields,
        default_sorting_field: "item_priority".to_string(),
        token_separators,
        symbols_to_index: settings.symbols_to_index.clone(),
    }
}
