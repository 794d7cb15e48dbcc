// ABOUTME: Factory for the configured content analyzer.
// ABOUTME: Resolves an analyzer kind into an Arc<dyn ContentAnalyzer>, or None when analysis is disabled.

use std::str::FromStr;
use std::sync::Arc;

use crate::analyzer::ContentAnalyzer;
use crate::gemini::GeminiAnalyzer;

/// Which analyzer backs categorization and SEO audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    Gemini,
    /// No model: studies are filed as General, audits are unavailable.
    None,
}

impl AnalyzerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyzerKind::Gemini => "gemini",
            AnalyzerKind::None => "none",
        }
    }
}

impl FromStr for AnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(AnalyzerKind::Gemini),
            "none" | "off" => Ok(AnalyzerKind::None),
            other => Err(format!("unsupported analyzer: {}", other)),
        }
    }
}

/// Create the analyzer for `kind`.
pub fn create_analyzer(kind: AnalyzerKind) -> Result<Option<Arc<dyn ContentAnalyzer>>, anyhow::Error> {
    match kind {
        AnalyzerKind::Gemini => {
            let analyzer = GeminiAnalyzer::from_env()
                .map_err(|e| anyhow::anyhow!("cannot configure gemini analyzer: {}", e))?;
            tracing::info!(model = analyzer.model_name(), "using gemini content analyzer");
            let analyzer: Arc<dyn ContentAnalyzer> = Arc::new(analyzer);
            Ok(Some(analyzer))
        }
        AnalyzerKind::None => {
            tracing::info!("content analysis disabled");
            Ok(None)
        }
    }
}
