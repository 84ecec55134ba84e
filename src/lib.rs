pub mod config;
pub mod index;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use index::errors::{ReindexError, ReindexResult};
pub use index::ingest::{BATCH_SIZE, IngestPipeline, IngestReport, IngestSource};
pub use index::lifecycle::CollectionLifecycle;
pub use index::pipeline::Reindexer;
pub use index::promote::AliasSwap;
pub use index::schema::{IndexSettings, collection_schema};
pub use index::transform::{RawRecord, TransformedDocument, transform};
pub use index::Collection;
pub use store::{ImportOutcome, StoreClient, StoreError};
