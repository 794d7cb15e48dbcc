// ABOUTME: Content-analysis collaborator for steeple, backed by a generative model.
// ABOUTME: Defines the analyzer trait, the Gemini adapter, and the degrade-to-default categorization wrapper.

pub mod analyzer;
pub mod client;
pub mod gemini;
pub mod json;
pub mod testing;

pub use analyzer::{
    AnalysisError, ContentAnalyzer, SeoAnalysis, audit_with_timeout, categorize_or_default,
};
pub use client::{AnalyzerKind, create_analyzer};
pub use gemini::GeminiAnalyzer;
pub use testing::StubAnalyzer;
