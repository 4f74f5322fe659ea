//! Streaming read -> validate -> batch -> flush orchestration.
//!
//! Both entry points (the upload endpoint and the offline `import` command)
//! drive this same type, so they produce identical results for the same
//! input stream and override parameter.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::batch::{BATCH_SIZE, BatchUpserter};
use super::record::parse_line;
use crate::db::Store;

/// Outcome of a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records durably inserted or updated.
    pub inserted: u64,
    /// Lines silently rejected (blank, unparsable, missing fields).
    pub skipped: u64,
    /// Total lines consumed from the stream.
    pub lines_read: u64,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// A flush failed. Batches flushed before this point stay committed;
    /// there is no retry and no compensating rollback.
    #[error("storage failure after {committed} records were committed: {source}")]
    Storage {
        committed: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read input stream: {0}")]
    Io(#[from] std::io::Error),
}

/// Single-threaded, cooperative ingestion over a line-delimited JSON stream.
///
/// Lines are processed strictly in file order because a later line for the
/// same `word_id` must win. Concurrent runs are permitted but uncoordinated:
/// overlapping `word_id`s resolve to last-write-wins at the storage layer.
pub struct IngestionPipeline {
    store: Store,
    batch_size: usize,
}

impl IngestionPipeline {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            batch_size: BATCH_SIZE,
        }
    }

    /// Batch-size override for tests; behavior is otherwise identical.
    #[must_use]
    pub fn with_batch_size(store: Store, batch_size: usize) -> Self {
        Self { store, batch_size }
    }

    /// Streams the reader line-by-line through validation and batched upsert,
    /// draining the final partial batch at end of stream.
    ///
    /// The payload is never held in memory as a whole; at most one batch of
    /// validated records is buffered at a time.
    pub async fn run<R>(
        &self,
        reader: R,
        override_book_id: Option<&str>,
    ) -> Result<IngestSummary, IngestError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut upserter = BatchUpserter::with_capacity(self.store.clone(), self.batch_size);
        let mut lines = reader.lines();
        let mut lines_read: u64 = 0;
        let mut skipped: u64 = 0;

        while let Some(line) = lines.next_line().await? {
            lines_read += 1;

            let Some(record) = parse_line(&line, override_book_id) else {
                if !line.trim().is_empty() {
                    debug!(line_number = lines_read, "skipping invalid corpus line");
                }
                skipped += 1;
                continue;
            };

            if let Err(source) = upserter.add(record).await {
                return Err(IngestError::Storage {
                    committed: upserter.processed(),
                    source,
                });
            }
        }

        if let Err(source) = upserter.flush().await {
            return Err(IngestError::Storage {
                committed: upserter.processed(),
                source,
            });
        }

        Ok(IngestSummary {
            inserted: upserter.processed(),
            skipped,
            lines_read,
        })
    }
}
