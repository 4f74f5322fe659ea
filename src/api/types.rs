use serde::Serialize;

use crate::db::AdminUser;
use crate::entities::admin_users::{AdminRole, AdminStatus};
use crate::entities::books;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub status: AdminStatus,
    pub created_at: String,
}

impl From<AdminUser> for AdminDto {
    fn from(admin: AdminUser) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            status: admin.status,
            created_at: admin.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub word_count: i32,
    pub cover_url: Option<String>,
    pub book_id: String,
    pub tags: serde_json::Value,
}

impl From<books::Model> for BookDto {
    fn from(book: books::Model) -> Self {
        Self {
            id: book.id,
            title: book.title,
            word_count: book.word_count,
            cover_url: book.cover_url,
            book_id: book.book_id,
            tags: book.tags,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub ok: bool,
    pub inserted_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
