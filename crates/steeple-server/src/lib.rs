// ABOUTME: HTTP server for steeple, exposing the collection repository to public pages and the admin panel.
// ABOUTME: Uses Axum with shared repository state, environment configuration, and a content analyzer.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{Backend, ConfigError, SteepleConfig};
pub use routes::create_router;
