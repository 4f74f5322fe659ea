//! Accumulates validated records and flushes them in bounded batches.

use anyhow::Result;

use super::record::WordRecord;
use crate::db::Store;

/// Records buffered before each durable write.
pub const BATCH_SIZE: usize = 500;

/// Buffers normalized records and upserts them against the word store.
///
/// `add` blocks the caller on a flush whenever the buffer reaches capacity,
/// so the input stream is never read further than one batch ahead of what is
/// durably written.
pub struct BatchUpserter {
    store: Store,
    buffer: Vec<WordRecord>,
    capacity: usize,
    processed: u64,
}

impl BatchUpserter {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_capacity(store, BATCH_SIZE)
    }

    /// Capacity override is for tests exercising batch boundaries; production
    /// callers use [`BATCH_SIZE`].
    #[must_use]
    pub fn with_capacity(store: Store, capacity: usize) -> Self {
        Self {
            store,
            buffer: Vec::with_capacity(capacity.min(BATCH_SIZE)),
            capacity: capacity.max(1),
            processed: 0,
        }
    }

    /// Appends a record, flushing synchronously once the buffer is full.
    pub async fn add(&mut self, record: WordRecord) -> Result<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            self.flush().await?;
        }
        Ok(())
    }

    /// Upserts every buffered record keyed on `word_id`, then clears the
    /// buffer. Must also be called once after stream exhaustion to drain the
    /// partial final batch.
    ///
    /// A failed flush leaves earlier batches committed; the error is
    /// surfaced to the caller along with [`Self::processed`].
    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.store.upsert_words(&self.buffer).await?;
        self.processed += self.buffer.len() as u64;
        self.buffer.clear();
        Ok(())
    }

    /// Count of records durably written so far.
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.processed
    }
}
