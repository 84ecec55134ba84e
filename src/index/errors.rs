//! Error taxonomy for a reindex run
//!
//! Every variant here is raised before the alias moves, so a failed run
//! never affects the live index. The one post-cutover hazard, failing to
//! delete the retired collection, is logged as a warning instead of
//! surfacing as an error.

use thiserror::Error;

use crate::store::{ImportOutcome, StoreError};

/// Result type alias for reindex operations
pub type ReindexResult<T> = Result<T, ReindexError>;

/// Fatal failures of a reindex run
#[derive(Debug, Error)]
pub enum ReindexError {
    /// The staging collection could not be provisioned
    #[error("failed to provision staging collection '{collection}': {source}")]
    Provision {
        collection: String,
        source: StoreError,
    },

    /// A bulk import call failed outright, before per-document outcomes
    /// were returned
    #[error("bulk import into '{collection}' failed: {source}")]
    Ingest {
        collection: String,
        source: StoreError,
    },

    /// One or more documents were rejected during bulk import; carries
    /// the failed outcomes for diagnosis
    #[error("{} document(s) failed to import into '{collection}'", .failures.len())]
    PartialIngest {
        collection: String,
        failures: Vec<ImportOutcome>,
    },

    /// The alias cutover failed; the previous alias target is untouched
    #[error("failed to promote '{collection}' behind alias '{alias}': {source}")]
    Promotion {
        alias: String,
        collection: String,
        source: StoreError,
    },

    /// Ingestion or promotion was attempted before provisioning
    #[error("staging collection has not been provisioned")]
    NotProvisioned,
}
