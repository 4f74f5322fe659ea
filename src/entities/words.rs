use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "words")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub word_rank: i32,

    pub head_word: String,

    /// Globally unique natural key; the upsert conflict target
    #[sea_orm(unique)]
    pub word_id: String,

    /// Natural reference into `books.book_id`; deliberately not enforced so
    /// books and words can be populated independently.
    pub book_id: String,

    /// Full original record, stored verbatim
    pub content: Json,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
