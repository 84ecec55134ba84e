//! Record transformation and priority scoring
//!
//! `transform` is the pure core of the pipeline: total, deterministic,
//! no external calls. Malformed optional fields are treated as absent,
//! never as errors, so every raw record yields exactly one ingestible
//! document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of hierarchy levels a record exposes (`lvl0`..`lvl6`).
pub const HIERARCHY_LEVELS: usize = 7;

/// A raw page record as produced by the crawler.
///
/// Loosely shaped: every field is optional, and anything the pipeline
/// does not recognize rides along in `extra` untouched (minus null
/// values, which are dropped during transformation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_without_anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default)]
    pub hierarchy: Hierarchy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested page hierarchy; absent levels stay `None` and are never
/// flattened into the output document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    pub lvl0: Option<String>,
    pub lvl1: Option<String>,
    pub lvl2: Option<String>,
    pub lvl3: Option<String>,
    pub lvl4: Option<String>,
    pub lvl5: Option<String>,
    pub lvl6: Option<String>,
}

impl Hierarchy {
    fn level(&self, index: usize) -> Option<&String> {
        match index {
            0 => self.lvl0.as_ref(),
            1 => self.lvl1.as_ref(),
            2 => self.lvl2.as_ref(),
            3 => self.lvl3.as_ref(),
            4 => self.lvl4.as_ref(),
            5 => self.lvl5.as_ref(),
            6 => self.lvl6.as_ref(),
            _ => None,
        }
    }
}

/// The `version` field arrives either as a comma-joined string or as an
/// already-split sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionField {
    Joined(String),
    List(Vec<String>),
}

/// Crawler-assigned weighting for a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Weight {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The ingestible form of a record.
///
/// Serializes flat (hierarchy levels as `hierarchy.lvlN` keys), never
/// contains a null value, and always carries `item_priority`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_without_anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(rename = "hierarchy.lvl0", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl0: Option<String>,
    #[serde(rename = "hierarchy.lvl1", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl1: Option<String>,
    #[serde(rename = "hierarchy.lvl2", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl2: Option<String>,
    #[serde(rename = "hierarchy.lvl3", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl3: Option<String>,
    #[serde(rename = "hierarchy.lvl4", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl4: Option<String>,
    #[serde(rename = "hierarchy.lvl5", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl5: Option<String>,
    #[serde(rename = "hierarchy.lvl6", skip_serializing_if = "Option::is_none")]
    pub hierarchy_lvl6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub item_priority: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Transform a raw page record into its ranked, ingestible form.
pub fn transform(record: &RawRecord) -> TransformedDocument {
    let content = record.content.as_deref().unwrap_or("");
    let depth = depth_rank(record.url_without_anchor.as_deref().unwrap_or(""), content);
    let item_priority = item_priority(record, depth);

    let version = match &record.version {
        Some(VersionField::Joined(joined)) => {
            Some(joined.split(',').map(str::to_string).collect())
        }
        Some(VersionField::List(list)) => Some(list.clone()),
        None => None,
    };

    // Unrecognized passthrough fields keep everything except null values.
    let extra: Map<String, Value> = record
        .extra
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    TransformedDocument {
        content: record.content.clone(),
        url: record.url.clone(),
        url_without_anchor: record.url_without_anchor.clone(),
        anchor: record.anchor.clone(),
        hierarchy_lvl0: record.hierarchy.level(0).cloned(),
        hierarchy_lvl1: record.hierarchy.level(1).cloned(),
        hierarchy_lvl2: record.hierarchy.level(2).cloned(),
        hierarchy_lvl3: record.hierarchy.level(3).cloned(),
        hierarchy_lvl4: record.hierarchy.level(4).cloned(),
        hierarchy_lvl5: record.hierarchy.level(5).cloned(),
        hierarchy_lvl6: record.hierarchy.level(6).cloned(),
        version,
        tags: record.tags.clone(),
        item_priority,
        extra,
    }
}

/// Rank a record by where its page sits relative to the content match.
///
/// Splits `url_without_anchor` (scheme stripped) into path segments and
/// checks each against the case-folded content with spaces joined by
/// `_` or `-`. A match on the final segment means the record is the
/// page itself (+20); a match on an earlier segment means the content
/// is reachable via a deeper page (0, deprioritized); no match at all
/// leaves the default 10.
///
/// The loop deliberately lets the last matching segment win rather than
/// taking a max over all matches. Carried over verbatim from the
/// original scoring behavior.
fn depth_rank(url_without_anchor: &str, content: &str) -> i64 {
    let stripped = url_without_anchor
        .strip_prefix("https://")
        .or_else(|| url_without_anchor.strip_prefix("http://"))
        .unwrap_or(url_without_anchor);
    let segments: Vec<&str> = stripped.split('/').collect();

    let folded = content.to_lowercase();
    let underscored = folded.replace(' ', "_");
    let dashed = folded.replace(' ', "-");

    let mut rank = 10;
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        if underscored.contains(segment) || dashed.contains(segment) {
            rank = if index == last { 20 } else { 0 };
        }
    }
    rank
}

/// Sum the relevance heuristic into a single sort key.
///
/// Introduction pages get promoted, changelogs and migration guides get
/// demoted, and the crawler-assigned weight contributes a fifth of its
/// level. The schema stores the result as int64, so the fractional
/// weight contribution truncates toward zero.
fn item_priority(record: &RawRecord, depth_rank: i64) -> i64 {
    let content = record.content.as_deref().unwrap_or("");
    let url = record.url.as_deref().unwrap_or("");

    let introduction_bonus = if content.contains("Introduction") {
        30.0
    } else {
        0.0
    };
    let weight_level = record
        .weight
        .as_ref()
        .and_then(|weight| weight.level)
        .unwrap_or(0.0);
    let changelog_penalty = if url.contains("changelog") { -50.0 } else { 0.0 };
    let migration_penalty = if url.contains("migration_guides") {
        -20.0
    } else {
        0.0
    };

    let raw = introduction_bonus
        + weight_level / 5.0
        + changelog_penalty
        + migration_penalty
        + depth_rank as f64;
    raw as i64
}
