// ABOUTME: Backup export and restore handlers.
// ABOUTME: Restore validates the whole document first and writes nothing when it is malformed.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use steeple_store::{BackupDocument, BackupError, export_backup, import_backup, validate_backup};

use super::{error_response, repository_error};
use crate::app_state::SharedState;

/// GET /api/backup - Snapshot of the configuration and every collection.
pub async fn export(State(state): State<SharedState>) -> Json<BackupDocument> {
    Json(export_backup(&state.repo).await)
}

/// POST /api/backup/restore - Replace everything with the document's contents.
pub async fn restore(
    State(state): State<SharedState>,
    Json(doc): Json<Value>,
) -> impl IntoResponse {
    let doc = match validate_backup(&doc) {
        Ok(doc) => doc,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // Held for the whole import: a workspace loaded or published mid-restore
    // would otherwise keep a pre-restore baseline.
    let mut workspace = state.workspace.lock().await;
    match import_backup(&state.repo, &doc).await {
        Ok(batch_id) => {
            *workspace = None;
            tracing::info!(batch_id = %batch_id, timestamp = %doc.timestamp, "backup restored");
            Json(serde_json::json!({ "batch_id": batch_id })).into_response()
        }
        Err(BackupError::Repository(e)) => repository_error(e),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}
