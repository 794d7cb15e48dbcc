// ABOUTME: Bible-study library and SEO audit handlers backed by the optional content analyzer.
// ABOUTME: Categorization falls back to General so a save never waits on the model failing.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use steeple_agent::{AnalysisError, audit_with_timeout, categorize_or_default};
use steeple_core::ids::today;
use steeple_core::ordering::extract_youtube_id;
use steeple_core::{StudyCategory, Video};

use super::{error_response, repository_error};
use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudyRequest {
    pub title: String,
    /// Any common YouTube link shape.
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Skips classification when set.
    #[serde(default)]
    pub category: Option<StudyCategory>,
}

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub title: String,
    pub content: String,
}

/// POST /api/studies - Add a video to the front of the study library.
pub async fn add_study(
    State(state): State<SharedState>,
    Json(req): Json<AddStudyRequest>,
) -> impl IntoResponse {
    let title = req.title.trim();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "title is required");
    }
    let Some(youtube_id) = extract_youtube_id(&req.url) else {
        return error_response(StatusCode::BAD_REQUEST, "url is not a recognizable YouTube link");
    };

    let description = req.description.unwrap_or_default();
    let category = match (req.category, state.analyzer.as_deref()) {
        (Some(category), _) => category,
        (None, Some(analyzer)) => {
            categorize_or_default(analyzer, title, &description, state.analysis_timeout).await
        }
        (None, None) => StudyCategory::General,
    };

    let video = Video {
        id: String::new(),
        title: title.to_string(),
        youtube_id,
        category,
        date: req.date.unwrap_or_else(today),
        description: Some(description).filter(|d| !d.is_empty()),
        ..Video::default()
    };

    match state.repo.add_study(video).await {
        Ok(video) => (StatusCode::CREATED, Json(video)).into_response(),
        Err(e) => repository_error(e),
    }
}

/// POST /api/seo/audit - Ask the analyzer for an SEO and answer-engine audit.
pub async fn audit(
    State(state): State<SharedState>,
    Json(req): Json<AuditRequest>,
) -> impl IntoResponse {
    let Some(analyzer) = state.analyzer.as_deref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "content analysis is disabled");
    };

    match audit_with_timeout(analyzer, &req.content, &req.title, state.analysis_timeout).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => {
            tracing::warn!(provider = analyzer.provider_name(), "seo audit failed: {}", e);
            let status = match e {
                AnalysisError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                AnalysisError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_response(status, e.to_string())
        }
    }
}
