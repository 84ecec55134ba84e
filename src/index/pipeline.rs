//! End-to-end reindex orchestration
//!
//! A [`Reindexer`] drives one run through its stages in order:
//! provision, then any number of ingestion calls while the crawler
//! walks the site, then a single promotion. Stages never overlap and a
//! later stage cannot start before the previous one succeeded.

use crate::store::StoreClient;

use super::Collection;
use super::errors::{ReindexError, ReindexResult};
use super::ingest::{IngestPipeline, IngestReport, IngestSource};
use super::lifecycle::CollectionLifecycle;
use super::promote::AliasSwap;
use super::schema::IndexSettings;
use super::transform::RawRecord;

/// One reindex run against a single alias.
///
/// Holds the uniquely-named staging collection for the run; concurrent
/// runs must use distinct staging names (single-writer assumption).
pub struct Reindexer {
    client: StoreClient,
    alias: String,
    staging_name: String,
    locale: String,
    settings: IndexSettings,
    staging: Option<Collection>,
}

impl Reindexer {
    #[must_use]
    pub fn new(
        client: StoreClient,
        alias: impl Into<String>,
        staging_name: impl Into<String>,
        locale: impl Into<String>,
        settings: IndexSettings,
    ) -> Self {
        Self {
            client,
            alias: alias.into(),
            staging_name: staging_name.into(),
            locale: locale.into(),
            settings,
            staging: None,
        }
    }

    /// The alias this run will publish under.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Provision the staging collection for this run.
    ///
    /// Must complete before any ingestion; failure here leaves the live
    /// alias and its collection completely unchanged.
    pub async fn provision(&mut self) -> ReindexResult<&Collection> {
        let collection = CollectionLifecycle::new(&self.client)
            .provision_staging(&self.staging_name, &self.locale, &self.settings)
            .await?;
        Ok(self.staging.insert(collection))
    }

    /// Ingest one set of records into the provisioned staging collection.
    ///
    /// Called repeatedly as the crawler yields pages. Errors with
    /// [`ReindexError::NotProvisioned`] when provisioning has not run.
    pub async fn ingest(
        &self,
        records: &[RawRecord],
        source: IngestSource<'_>,
    ) -> ReindexResult<IngestReport> {
        let staging = self.staging.as_ref().ok_or(ReindexError::NotProvisioned)?;
        IngestPipeline::new(&self.client)
            .ingest(staging, records, source)
            .await
    }

    /// Cut the alias over to the populated staging collection and retire
    /// the previous target.
    pub async fn promote(&mut self) -> ReindexResult<()> {
        let staging = self.staging.as_ref().ok_or(ReindexError::NotProvisioned)?;
        AliasSwap::new(&self.client).promote(&self.alias, staging).await?;
        self.staging = None;
        Ok(())
    }

    /// Run all three stages over a single record set.
    pub async fn run(
        &mut self,
        records: &[RawRecord],
        source: IngestSource<'_>,
    ) -> ReindexResult<IngestReport> {
        self.provision().await?;
        let report = self.ingest(records, source).await?;
        self.promote().await?;
        Ok(report)
    }
}
