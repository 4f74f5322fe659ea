use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, BookDto};

/// GET /books
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookDto>>, ApiError> {
    let books = state
        .store()
        .list_books()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list books: {e}")))?;

    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}
