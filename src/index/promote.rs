//! Blue-green alias cutover
//!
//! Promotion is the only externally-visible transition of a reindex
//! run. Order matters: read the current target first, upsert the alias
//! (the atomic cutover point), and only then delete the previous
//! collection. A failure before the upsert leaves the live index
//! untouched; a failure after it only orphans a collection.

use crate::store::StoreClient;

use super::Collection;
use super::errors::{ReindexError, ReindexResult};

/// Orchestrates the atomic repointing of an alias to a new collection.
pub struct AliasSwap<'a> {
    client: &'a StoreClient,
}

impl<'a> AliasSwap<'a> {
    #[must_use]
    pub fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Repoint `alias` at the populated staging collection and retire
    /// the previous target.
    ///
    /// An absent alias means this is the first-ever reindex; there is
    /// nothing to retire. The retired collection is deleted only when
    /// it exists and differs from the new target, and a failed delete
    /// is a warning, not a run failure, because readers already resolve
    /// to the new collection.
    pub async fn promote(&self, alias: &str, staging: &Collection) -> ReindexResult<()> {
        let promotion_error = |source| ReindexError::Promotion {
            alias: alias.to_string(),
            collection: staging.name().to_string(),
            source,
        };

        let previous = self.client.get_alias(alias).await.map_err(promotion_error)?;

        self.client
            .upsert_alias(alias, staging.name())
            .await
            .map_err(promotion_error)?;
        tracing::info!(
            alias = %alias,
            collection = %staging.name(),
            "alias cutover complete"
        );

        if let Some(previous) = previous {
            if previous != staging.name() {
                if let Err(e) = self.client.delete_collection(&previous).await {
                    log::warn!(
                        "promotion succeeded but retired collection '{previous}' could not be deleted: {e}"
                    );
                } else {
                    log::info!("retired previous collection '{previous}'");
                }
            }
        }

        Ok(())
    }
}
