// ABOUTME: Test utilities for steeple-agent, including a stub content analyzer.
// ABOUTME: Used in tests to simulate model answers, failures, and slow responses without API calls.

use std::time::Duration;

use async_trait::async_trait;
use steeple_core::StudyCategory;

use crate::analyzer::{AnalysisError, ContentAnalyzer, SeoAnalysis};

#[derive(Debug, Clone)]
enum Reply {
    Label(String),
    Fail,
}

/// A stub analyzer returning a pre-configured answer.
#[derive(Debug, Clone)]
pub struct StubAnalyzer {
    reply: Reply,
    delay: Option<Duration>,
    seo: SeoAnalysis,
}

impl Default for StubAnalyzer {
    fn default() -> Self {
        Self::with_category(StudyCategory::General)
    }
}

impl StubAnalyzer {
    /// Always answers with the given category.
    pub fn with_category(category: StudyCategory) -> Self {
        Self::with_label(category.as_str())
    }

    /// Answers with a raw label, which may not be a known category.
    pub fn with_label(label: &str) -> Self {
        Self {
            reply: Reply::Label(label.to_owned()),
            delay: None,
            seo: SeoAnalysis {
                meta_title: "Stub title".to_owned(),
                meta_description: "Stub description".to_owned(),
                aeo_snippet: "Stub snippet".to_owned(),
                readability_score: 80.0,
                schema_json_ld: "{}".to_owned(),
                ..SeoAnalysis::default()
            },
        }
    }

    /// Every call fails with a provider error.
    pub fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            ..Self::default()
        }
    }

    /// Wait before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ContentAnalyzer for StubAnalyzer {
    async fn categorize_study(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<StudyCategory, AnalysisError> {
        self.wait().await;
        match &self.reply {
            Reply::Label(label) => label
                .trim()
                .parse()
                .map_err(|_| AnalysisError::UnrecognizedLabel(label.clone())),
            Reply::Fail => Err(AnalysisError::ProviderError("stub failure".to_owned())),
        }
    }

    async fn audit_seo(&self, _content: &str, _title: &str) -> Result<SeoAnalysis, AnalysisError> {
        self.wait().await;
        match self.reply {
            Reply::Label(_) => Ok(self.seo.clone()),
            Reply::Fail => Err(AnalysisError::ProviderError("stub failure".to_owned())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
