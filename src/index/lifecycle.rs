//! Staging collection provisioning
//!
//! Owns collection creation and teardown against the store. A staging
//! collection is created fresh per reindex run; any stale collection of
//! the same name left behind by an abandoned run is deleted first.

use crate::store::StoreClient;

use super::Collection;
use super::errors::{ReindexError, ReindexResult};
use super::schema::{IndexSettings, collection_schema};

/// Creates and destroys physical collections; owns the schema definition.
pub struct CollectionLifecycle<'a> {
    client: &'a StoreClient,
}

impl<'a> CollectionLifecycle<'a> {
    #[must_use]
    pub fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Provision an empty staging collection under `name`.
    ///
    /// Idempotent with respect to leftovers: a pre-existing collection
    /// with the same name is deleted first (not-found is not an error).
    /// Store rejection of the schema or an unreachable store is fatal
    /// for the run; nothing visible to readers has changed at this
    /// point.
    pub async fn provision_staging(
        &self,
        name: &str,
        locale: &str,
        settings: &IndexSettings,
    ) -> ReindexResult<Collection> {
        match self.client.delete_collection(name).await {
            Ok(true) => {
                log::debug!("deleted stale staging collection '{name}' from a previous run");
            }
            Ok(false) => {}
            Err(source) => {
                return Err(ReindexError::Provision {
                    collection: name.to_string(),
                    source,
                });
            }
        }

        let schema = collection_schema(name, locale, settings);
        self.client
            .create_collection(&schema)
            .await
            .map_err(|source| ReindexError::Provision {
                collection: name.to_string(),
                source,
            })?;

        log::info!("provisioned staging collection '{name}'");
        Ok(Collection::new(name))
    }
}
