// Reindex CLI: load extracted page records from a JSON file and publish
// them behind an alias as one atomic blue-green cutover.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use citeindex::{IndexSettings, IngestSource, RawRecord, Reindexer, StoreClient, StoreConfig};

const USAGE: &str = "usage: citeindex <alias> <records.json> [settings.json]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let alias = args.next().context(USAGE)?;
    let records_path = args.next().context(USAGE)?;
    let settings = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings file {path}"))?;
            serde_json::from_str::<IndexSettings>(&raw)
                .with_context(|| format!("parsing settings file {path}"))?
        }
        None => IndexSettings::default(),
    };

    let config = StoreConfig::from_env()?;
    let client = StoreClient::from_config(&config)?;

    let raw = std::fs::read_to_string(&records_path)
        .with_context(|| format!("reading records file {records_path}"))?;
    let records: Vec<RawRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing records file {records_path}"))?;

    let mut reindexer = Reindexer::new(
        client,
        alias.clone(),
        staging_name(&alias),
        config.locale.clone(),
        settings,
    );
    let report = reindexer
        .run(
            &records,
            IngestSource {
                url: &records_path,
                from_sitemap: false,
            },
        )
        .await?;

    log::info!(
        "published {} documents behind alias '{alias}' in {} batch(es)",
        report.documents_ingested,
        report.batches_submitted
    );
    Ok(())
}

/// Unique staging collection name per run, so an abandoned run never
/// collides with the next one.
fn staging_name(alias: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{alias}_{timestamp}")
}
