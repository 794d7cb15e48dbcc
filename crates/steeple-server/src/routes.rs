// ABOUTME: Route definitions for the steeple HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state, tracing, and CORS.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(api::site::get_config).put(api::site::put_config))
        .route("/api/site", get(api::site::get_site))
        .route(
            "/api/collections/{key}",
            get(api::site::get_collection).put(api::site::put_collection),
        )
        .route("/api/announcements", get(api::site::list_announcements))
        .route("/api/admin/workspace", get(api::admin::get_workspace))
        .route("/api/admin/publish", post(api::admin::publish))
        .route("/api/admin/revert", post(api::admin::revert))
        .route("/api/backup", get(api::backup::export))
        .route("/api/backup/restore", post(api::backup::restore))
        .route("/api/users/{id}/progress", post(api::academy::record_progress))
        .route("/api/users/{id}/enroll", post(api::academy::enroll))
        .route("/api/pages/{page}/view", post(api::funnels::record_view))
        .route("/api/pages/{page}/convert", post(api::funnels::record_conversion))
        .route("/api/folders/{id}", delete(api::assets::delete_folder))
        .route("/api/studies", post(api::studies::add_study))
        .route("/api/seo/audit", post(api::studies::audit))
        .route("/api/prayers", post(api::community::submit_prayer))
        .route("/api/prayers/{id}/pray", post(api::community::pray_for))
        .route(
            "/api/chat",
            post(api::community::post_message).delete(api::community::clear_chat),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
