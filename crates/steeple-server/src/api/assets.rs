// ABOUTME: Asset library handlers.
// ABOUTME: Deleting a folder cascades to its subfolders and every asset they held.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::repository_error;
use crate::app_state::SharedState;

/// DELETE /api/folders/{id} - Remove a folder, its subfolders, and their assets.
pub async fn delete_folder(
    State(state): State<SharedState>,
    Path(folder_id): Path<String>,
) -> impl IntoResponse {
    match state.repo.delete_folder(&folder_id).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => repository_error(e),
    }
}
