// ABOUTME: Academy handlers for enrolment and lesson progress on a user's record.
// ABOUTME: Completing a course's last lesson awards its certificate in the same request.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use steeple_core::{Course, User};

use super::repository_error;
use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub lesson_id: String,
    /// When given, a certificate is awarded if this completes the course.
    #[serde(default)]
    pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: String,
}

/// POST /api/users/{id}/progress - Mark a lesson complete.
pub async fn record_progress(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(req): Json<ProgressRequest>,
) -> impl IntoResponse {
    let mut user = match state.repo.record_progress(&user_id, &req.lesson_id).await {
        Ok(user) => user,
        Err(e) => return repository_error(e),
    };

    let mut certificate_awarded = false;
    if let Some(course_id) = req.course_id {
        let courses: Vec<Course> = state.repo.load().await;
        if let Some(course) = courses.iter().find(|c| c.id == course_id) {
            match state.repo.award_certificate_if_complete(&user_id, course).await {
                Ok(awarded) => certificate_awarded = awarded,
                Err(e) => return repository_error(e),
            }
        } else {
            tracing::warn!(course_id = %course_id, "progress names an unknown course");
        }
    }

    if certificate_awarded {
        let users: Vec<User> = state.repo.load().await;
        if let Some(updated) = users.into_iter().find(|u| u.id == user_id) {
            user = updated;
        }
    }

    Json(serde_json::json!({
        "user": user,
        "certificate_awarded": certificate_awarded,
    }))
    .into_response()
}

/// POST /api/users/{id}/enroll - Enrol a user in a course.
pub async fn enroll(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(req): Json<EnrollRequest>,
) -> impl IntoResponse {
    match state.repo.enroll(&user_id, &req.course_id).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => repository_error(e),
    }
}
