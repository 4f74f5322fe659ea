use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub word_count: i32,

    pub cover_url: Option<String>,

    /// Natural key referenced by `words.book_id` (advisory, not an FK)
    #[sea_orm(unique)]
    pub book_id: String,

    /// Ordered JSON array of tag strings
    pub tags: Json,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
