//! HTTP client for the Typesense-compatible document store
//!
//! Every operation the reindex pipeline consumes from the store lives
//! behind [`StoreClient`]: collection create/delete, JSONL bulk import
//! with per-document outcomes, and alias read/upsert. Responses are
//! decoded once here at the boundary; callers only ever see structured
//! types.

pub mod client;
pub mod errors;
pub mod types;

pub use client::StoreClient;
pub use errors::{StoreError, StoreResult};
pub use types::{AliasTarget, CollectionSchema, FieldSpec, ImportOutcome};
