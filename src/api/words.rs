use axum::{Json, extract::Multipart, extract::State};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use super::{ApiError, AppState, UploadSummary};
use crate::ingest::{IngestError, IngestionPipeline};

/// POST /words/upload
///
/// Multipart upload of a line-delimited JSON corpus. The optional `bookId`
/// text part must precede the `file` part; the file is streamed straight
/// into the ingestion pipeline without being buffered in memory.
pub async fn upload_words(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadSummary>, ApiError> {
    let mut override_book_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("bookId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Unreadable bookId field: {e}")))?;
                if !value.trim().is_empty() {
                    override_book_id = Some(value);
                }
            }
            Some("file") => {
                let reader = StreamReader::new(field.map_err(std::io::Error::other));

                let pipeline = IngestionPipeline::new(state.store().clone());
                let summary = pipeline
                    .run(reader, override_book_id.as_deref())
                    .await
                    .map_err(|e| match e {
                        IngestError::Storage { committed, source } => ApiError::internal(format!(
                            "Upload failed after {committed} records were committed: {source}"
                        )),
                        IngestError::Io(source) => {
                            ApiError::validation(format!("Failed to read upload stream: {source}"))
                        }
                    })?;

                tracing::info!(
                    inserted = summary.inserted,
                    skipped = summary.skipped,
                    lines = summary.lines_read,
                    "Word upload complete"
                );

                return Ok(Json(UploadSummary {
                    ok: true,
                    inserted_count: summary.inserted,
                }));
            }
            _ => {}
        }
    }

    Err(ApiError::validation("Missing 'file' field"))
}
