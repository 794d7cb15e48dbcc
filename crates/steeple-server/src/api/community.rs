// ABOUTME: Prayer wall and community chat handlers.
// ABOUTME: Role strings in requests are trusted as sent; only chat clearing checks them.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use steeple_core::Role;

use super::repository_error;
use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequestBody {
    pub user_id: String,
    pub user_name: String,
    pub request: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPostBody {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearChatParams {
    pub role: Role,
}

/// POST /api/prayers - Post a request to the top of the wall.
pub async fn submit_prayer(
    State(state): State<SharedState>,
    Json(body): Json<PrayerRequestBody>,
) -> impl IntoResponse {
    match state
        .repo
        .submit_prayer(&body.user_id, &body.user_name, &body.request)
        .await
    {
        Ok(prayer) => (StatusCode::CREATED, Json(prayer)).into_response(),
        Err(e) => repository_error(e),
    }
}

/// POST /api/prayers/{id}/pray - Count one more person praying.
pub async fn pray_for(
    State(state): State<SharedState>,
    Path(prayer_id): Path<String>,
) -> impl IntoResponse {
    match state.repo.pray_for(&prayer_id).await {
        Ok(prayer) => Json(prayer).into_response(),
        Err(e) => repository_error(e),
    }
}

/// POST /api/chat - Append a message.
pub async fn post_message(
    State(state): State<SharedState>,
    Json(body): Json<ChatPostBody>,
) -> impl IntoResponse {
    match state
        .repo
        .post_chat_message(&body.user_id, &body.user_name, body.role, &body.text)
        .await
    {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => repository_error(e),
    }
}

/// DELETE /api/chat?role=... - Purge the history. Admins and pastors only.
pub async fn clear_chat(
    State(state): State<SharedState>,
    Query(params): Query<ClearChatParams>,
) -> impl IntoResponse {
    match state.repo.clear_chat(params.role).await {
        Ok(removed) => Json(serde_json::json!({ "removed": removed })).into_response(),
        Err(e) => repository_error(e),
    }
}
