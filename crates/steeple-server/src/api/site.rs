// ABOUTME: Configuration and collection handlers used by the public site and simple admin edits.
// ABOUTME: Reads never fail; writes report quota and validation failures to the caller.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use steeple_core::ordering::sort_announcements;
use steeple_core::{Announcement, CollectionKey, SiteConfig, StoredConfig};

use super::{error_response, repository_error};
use crate::app_state::SharedState;

/// GET /api/config - The configuration exactly as stored, possibly partial.
pub async fn get_config(State(state): State<SharedState>) -> Json<StoredConfig> {
    Json(state.repo.get_config().await)
}

/// GET /api/site - The configuration merged over the defaults.
pub async fn get_site(State(state): State<SharedState>) -> Json<SiteConfig> {
    Json(state.repo.get_site_config().await)
}

/// PUT /api/config - Replace the stored configuration.
pub async fn put_config(
    State(state): State<SharedState>,
    Json(config): Json<StoredConfig>,
) -> impl IntoResponse {
    match state.repo.set_config(&config).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error(e),
    }
}

fn collection_key(key: &str) -> Result<CollectionKey, axum::response::Response> {
    CollectionKey::from_storage_key(key)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("unknown collection: {}", key)))
}

/// GET /api/collections/{key} - One collection as stored.
pub async fn get_collection(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match collection_key(&key) {
        Ok(key) => Json(state.repo.load_value(key).await).into_response(),
        Err(resp) => resp,
    }
}

/// PUT /api/collections/{key} - Replace one collection.
pub async fn put_collection(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(items): Json<Value>,
) -> impl IntoResponse {
    let key = match collection_key(&key) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    if !items.is_array() {
        return error_response(StatusCode::BAD_REQUEST, "collection body must be an array");
    }
    match state.repo.save_value(key, items).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error(e),
    }
}

/// GET /api/announcements - Urgent first, newest first within a priority.
pub async fn list_announcements(State(state): State<SharedState>) -> Json<Vec<Announcement>> {
    let mut items: Vec<Announcement> = state.repo.load().await;
    sort_announcements(&mut items);
    Json(items)
}
