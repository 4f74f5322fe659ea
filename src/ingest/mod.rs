//! The bulk word-ingestion pipeline: streaming NDJSON parse, per-line
//! validation, bounded batching, and idempotent upsert keyed on `word_id`.

mod batch;
mod pipeline;
mod record;

pub use batch::{BATCH_SIZE, BatchUpserter};
pub use pipeline::{IngestError, IngestSummary, IngestionPipeline};
pub use record::{WordRecord, parse_line};
