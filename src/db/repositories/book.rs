use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::books;

pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<books::Model>> {
        books::Entity::find()
            .order_by_asc(books::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list books")
    }

    pub async fn get_by_book_id(&self, book_id: &str) -> Result<Option<books::Model>> {
        books::Entity::find()
            .filter(books::Column::BookId.eq(book_id))
            .one(&self.conn)
            .await
            .context("Failed to query book by book_id")
    }
}
