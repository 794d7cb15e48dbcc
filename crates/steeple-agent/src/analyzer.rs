// ABOUTME: The ContentAnalyzer trait every model adapter implements, with its result and error types.
// ABOUTME: Categorization degrades to General on any failure; SEO audit failures reach the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use steeple_core::StudyCategory;

/// Errors that can occur while asking a model to analyze content.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Unrecognized category label: {0:?}")]
    UnrecognizedLabel(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A search and answer-engine optimization audit of one piece of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoAnalysis {
    pub meta_title: String,
    pub meta_description: String,
    /// A short direct-answer paragraph for AI search engines.
    pub aeo_snippet: String,
    pub keywords: Vec<String>,
    /// 0 to 100.
    pub readability_score: f64,
    pub entities: Vec<String>,
    pub schema_json_ld: String,
    pub suggestions: Vec<String>,
}

/// An external service that classifies and audits site content.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Pick the bible-study category that best fits a video.
    async fn categorize_study(
        &self,
        title: &str,
        description: &str,
    ) -> Result<StudyCategory, AnalysisError>;

    /// Audit content for search and answer-engine visibility.
    async fn audit_seo(&self, content: &str, title: &str) -> Result<SeoAnalysis, AnalysisError>;

    /// Provider name for logging and display (e.g. "gemini").
    fn provider_name(&self) -> &str;
}

/// Categorize a study, falling back to `General` on error, timeout, or an
/// unrecognized label. Never fails, so it cannot block a save.
pub async fn categorize_or_default(
    analyzer: &dyn ContentAnalyzer,
    title: &str,
    description: &str,
    timeout: Duration,
) -> StudyCategory {
    match tokio::time::timeout(timeout, analyzer.categorize_study(title, description)).await {
        Ok(Ok(category)) => category,
        Ok(Err(e)) => {
            tracing::warn!(
                provider = analyzer.provider_name(),
                "categorization failed, using General: {}",
                e
            );
            StudyCategory::General
        }
        Err(_) => {
            tracing::warn!(
                provider = analyzer.provider_name(),
                "categorization timed out after {:?}, using General",
                timeout
            );
            StudyCategory::General
        }
    }
}

/// Run an SEO audit with an upper bound on how long it may take.
pub async fn audit_with_timeout(
    analyzer: &dyn ContentAnalyzer,
    content: &str,
    title: &str,
    timeout: Duration,
) -> Result<SeoAnalysis, AnalysisError> {
    tokio::time::timeout(timeout, analyzer.audit_seo(content, title))
        .await
        .map_err(|_| AnalysisError::Timeout(timeout))?
}
