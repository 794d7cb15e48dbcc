// ABOUTME: API module containing all HTTP handler functions for the steeple REST API.
// ABOUTME: Also maps repository and publish failures onto HTTP status codes with a JSON error body.

pub mod academy;
pub mod admin;
pub mod assets;
pub mod backup;
pub mod community;
pub mod funnels;
pub mod site;
pub mod studies;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use steeple_store::RepositoryError;

/// Message shown when storage has no room left. Nothing from the request was kept.
pub(crate) const STORAGE_FULL: &str =
    "storage is full and nothing was saved; free some space (large images first) and retry";

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Map a repository failure to a response. Quota failures get their own
/// status so clients can tell them apart from other write errors.
pub(crate) fn repository_error(err: RepositoryError) -> Response {
    if err.is_quota_exceeded() {
        tracing::warn!("write rejected: {}", err);
        return error_response(StatusCode::INSUFFICIENT_STORAGE, STORAGE_FULL);
    }
    let status = match &err {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepositoryError::InvalidItems { .. } | RepositoryError::Invalid(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Forbidden { .. } => StatusCode::FORBIDDEN,
        RepositoryError::Unreadable { .. } => StatusCode::CONFLICT,
        RepositoryError::Store(_) | RepositoryError::Batch(_) => {
            tracing::error!("storage failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.to_string())
}
