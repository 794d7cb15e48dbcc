// ABOUTME: Landing-page counters: views by slug and conversions by id, with optional lead capture.
// ABOUTME: Both counters are read-modify-writes serialized by the repository.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::repository_error;
use crate::app_state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /api/pages/{slug}/view - Count a visit to an active landing page.
pub async fn record_view(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.repo.record_page_view(&slug).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => repository_error(e),
    }
}

/// POST /api/pages/{id}/convert - Count a conversion and keep the lead's email.
pub async fn record_conversion(
    State(state): State<SharedState>,
    Path(page_id): Path<String>,
    Json(req): Json<ConvertRequest>,
) -> impl IntoResponse {
    match state
        .repo
        .record_conversion(&page_id, req.email.as_deref())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => repository_error(e),
    }
}
