use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::entities::words;
use crate::ingest::WordRecord;

pub struct WordRepository {
    conn: DatabaseConnection,
}

impl WordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Upserts a batch of normalized records in one statement, keyed on the
    /// `word_id` natural key.
    ///
    /// Existing rows get `word_rank`, `head_word`, `book_id`, and `content`
    /// overwritten; `id` and `created_at` stay untouched. Rows are applied
    /// in slice order, so a later record for the same `word_id` wins even
    /// within a single batch.
    pub async fn upsert_batch(&self, records: &[WordRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now();
        let models = records.iter().map(|record| words::ActiveModel {
            word_rank: Set(record.word_rank),
            head_word: Set(record.head_word.clone()),
            word_id: Set(record.word_id.clone()),
            book_id: Set(record.book_id.clone()),
            content: Set(record.content.clone()),
            created_at: Set(now),
            ..Default::default()
        });

        words::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(words::Column::WordId)
                    .update_columns([
                        words::Column::WordRank,
                        words::Column::HeadWord,
                        words::Column::BookId,
                        words::Column::Content,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to upsert word batch")?;

        Ok(())
    }

    pub async fn get_by_word_id(&self, word_id: &str) -> Result<Option<words::Model>> {
        words::Entity::find()
            .filter(words::Column::WordId.eq(word_id))
            .one(&self.conn)
            .await
            .context("Failed to query word by word_id")
    }

    pub async fn count(&self) -> Result<u64> {
        words::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count words")
    }

    pub async fn count_for_book(&self, book_id: &str) -> Result<u64> {
        words::Entity::find()
            .filter(words::Column::BookId.eq(book_id))
            .count(&self.conn)
            .await
            .context("Failed to count words for book")
    }
}
