// ABOUTME: Admin panel handlers: load the working copy, publish edits, and discard them.
// ABOUTME: The server keeps the published baseline so only changed parts are written.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use steeple_store::{AdminWorkspace, PublishError, WorkspaceEdit};

use super::{STORAGE_FULL, error_response};
use crate::app_state::SharedState;

fn workspace_body(ws: &AdminWorkspace) -> Response {
    Json(serde_json::json!({
        "config": ws.config,
        "collections": ws.collections,
        "changed": ws.changed(),
        "unreadable": ws.unreadable,
    }))
    .into_response()
}

/// GET /api/admin/workspace - Reload configuration and every collection.
pub async fn get_workspace(State(state): State<SharedState>) -> impl IntoResponse {
    // Held across the load so a concurrent restore cannot be shadowed by a stale copy.
    let mut guard = state.workspace.lock().await;
    let fresh = AdminWorkspace::load(&state.repo).await;
    let body = workspace_body(&fresh);
    *guard = Some(fresh);
    body
}

/// POST /api/admin/publish - Apply the client's edits and write what changed.
pub async fn publish(
    State(state): State<SharedState>,
    Json(edit): Json<WorkspaceEdit>,
) -> impl IntoResponse {
    let mut guard = state.workspace().await;
    let Some(ws) = guard.as_mut() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "workspace unavailable");
    };

    ws.apply(edit);
    match ws.publish(&state.repo).await {
        Ok(report) => Json(report).into_response(),
        Err(e) if e.is_quota_exceeded() => {
            error_response(StatusCode::INSUFFICIENT_STORAGE, STORAGE_FULL)
        }
        Err(e @ PublishError::Unreadable(_)) => error_response(StatusCode::CONFLICT, e.to_string()),
        Err(e @ PublishError::Serialize { .. }) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// POST /api/admin/revert - Drop unpublished edits.
pub async fn revert(State(state): State<SharedState>) -> impl IntoResponse {
    let mut guard = state.workspace().await;
    match guard.as_mut() {
        Some(ws) => {
            ws.revert();
            workspace_body(ws)
        }
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "workspace unavailable"),
    }
}
