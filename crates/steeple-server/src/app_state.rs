// ABOUTME: Shared application state for the steeple HTTP server.
// ABOUTME: Holds the repository, the optional content analyzer, and the admin panel's open workspace.

use std::sync::Arc;
use std::time::Duration;

use steeple_agent::ContentAnalyzer;
use steeple_store::{AdminWorkspace, Repository};
use tokio::sync::Mutex;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub repo: Repository,
    /// None when content analysis is disabled.
    pub analyzer: Option<Arc<dyn ContentAnalyzer>>,
    pub analysis_timeout: Duration,
    /// The admin panel's working copy, loaded on first request.
    pub workspace: Mutex<Option<AdminWorkspace>>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        repo: Repository,
        analyzer: Option<Arc<dyn ContentAnalyzer>>,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            analyzer,
            analysis_timeout,
            workspace: Mutex::new(None),
        }
    }

    /// Return the open workspace, loading it from the repository if needed.
    pub async fn workspace(&self) -> tokio::sync::MutexGuard<'_, Option<AdminWorkspace>> {
        let mut guard = self.workspace.lock().await;
        if guard.is_none() {
            *guard = Some(AdminWorkspace::load(&self.repo).await);
        }
        guard
    }
}
