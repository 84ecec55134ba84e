//! The reindex pipeline: transform, provision, ingest, promote
//!
//! One reindex run walks a fixed state machine:
//! `Empty → Provisioned → Populated → Promoted → (old collection) Retired`.
//! Everything before promotion is invisible to readers, who only ever
//! resolve queries through the alias.

pub mod errors;
pub mod ingest;
pub mod lifecycle;
pub mod pipeline;
pub mod promote;
pub mod schema;
pub mod transform;

/// Handle to a provisioned staging collection.
///
/// Only [`lifecycle::CollectionLifecycle::provision_staging`] produces
/// one, so holding a `Collection` is proof that provisioning succeeded
/// before ingestion or promotion start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
}

impl Collection {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The collection's physical name in the store.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
