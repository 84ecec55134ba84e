//! Chunked bulk ingestion with partial-failure detection
//!
//! Transforms every raw record, submits the documents in fixed-size
//! batches, and fails the run on the first batch reporting any
//! unsuccessful per-document outcome. Already-written documents are
//! left in the staging collection; the recovery path is the next run's
//! fresh provisioning, not a rollback.

use crate::store::{ImportOutcome, StoreClient};

use super::Collection;
use super::errors::{ReindexError, ReindexResult};
use super::transform::{RawRecord, transform};

/// Documents per bulk-import call.
pub const BATCH_SIZE: usize = 50;

/// Where a set of records came from, for the progress line.
#[derive(Debug, Clone, Copy)]
pub struct IngestSource<'a> {
    /// URL of the page (or sitemap entry) the records were extracted from.
    pub url: &'a str,
    /// Whether the page was discovered through the sitemap rather than
    /// by crawling links.
    pub from_sitemap: bool,
}

/// Summary of one successful ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub documents_ingested: usize,
    pub batches_submitted: usize,
}

/// Submits transformed documents to the staging collection in batches.
pub struct IngestPipeline<'a> {
    client: &'a StoreClient,
}

impl<'a> IngestPipeline<'a> {
    #[must_use]
    pub fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Transform and ingest `records` into the staging collection.
    ///
    /// Batches are submitted sequentially. Any batch whose outcomes
    /// include a failure aborts the run with those outcomes attached;
    /// later batches are not issued, since the staging collection is
    /// discarded wholesale on the next run anyway.
    pub async fn ingest(
        &self,
        collection: &Collection,
        records: &[RawRecord],
        source: IngestSource<'_>,
    ) -> ReindexResult<IngestReport> {
        let documents: Vec<_> = records.iter().map(transform).collect();
        let mut batches_submitted = 0;

        for batch in documents.chunks(BATCH_SIZE) {
            let outcomes = self
                .client
                .import_documents(collection.name(), batch)
                .await
                .map_err(|source| ReindexError::Ingest {
                    collection: collection.name().to_string(),
                    source,
                })?;
            batches_submitted += 1;

            let failures: Vec<ImportOutcome> =
                outcomes.into_iter().filter(|o| !o.success).collect();
            if !failures.is_empty() {
                log::error!(
                    "batch {batches_submitted} into '{}' rejected {} document(s), first error: {}",
                    collection.name(),
                    failures.len(),
                    failures[0].error.as_deref().unwrap_or("unknown"),
                );
                return Err(ReindexError::PartialIngest {
                    collection: collection.name().to_string(),
                    failures,
                });
            }
        }

        let origin = if source.from_sitemap { "sitemap" } else { "crawl" };
        log::info!(
            "{}: {} records ingested ({origin})",
            source.url,
            documents.len()
        );

        Ok(IngestReport {
            documents_ingested: documents.len(),
            batches_submitted,
        })
    }
}
