// ABOUTME: Google Gemini adapter implementing ContentAnalyzer over the generateContent REST API.
// ABOUTME: Builds the categorization and SEO audit prompts and maps HTTP failures to AnalysisError.

use async_trait::async_trait;
use serde_json::{Value, json};
use steeple_core::StudyCategory;

use crate::analyzer::{AnalysisError, ContentAnalyzer, SeoAnalysis};
use crate::json::extract_json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini content analyzer.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiAnalyzer {
    /// Create a new GeminiAnalyzer reading configuration from environment variables.
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_BASE_URL` (defaults to https://generativelanguage.googleapis.com)
    /// Optional: `GEMINI_MODEL` (defaults to gemini-2.0-flash)
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AnalysisError::ProviderError("GEMINI_API_KEY not set".to_string()))?;

        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Request body asking for exactly one category name.
    pub fn categorize_request_body(title: &str, description: &str) -> Value {
        let categories: Vec<&str> = StudyCategory::ALL.iter().map(|c| c.as_str()).collect();
        let prompt = format!(
            "Categorize this Bible study video titled \"{}\" with description \"{}\".\n\
             Pick exactly one from these categories: {}.\n\
             Return ONLY the category name.",
            title,
            description,
            categories.join(", ")
        );

        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generation_config": {"temperature": 0.1}
        })
    }

    /// Request body for the SEO/AEO audit, constrained to a JSON response.
    pub fn audit_request_body(content: &str, title: &str) -> Value {
        let prompt = format!(
            "Perform an SEO and AEO (Answer Engine Optimization) audit on the following content for a church website.\n\n\
             TITLE: {}\n\
             CONTENT: {}\n\n\
             Tasks:\n\
             1. Create a CTR-optimized meta title (max 60 chars).\n\
             2. Create a compelling meta description (max 155 chars).\n\
             3. Create a 50-word direct answer paragraph summarizing the content for AI search engines.\n\
             4. Extract 5-10 semantic entities (key topics, people, places).\n\
             5. Generate a valid JSON-LD Schema.org object (Article, or FAQPage if appropriate).\n\
             6. Provide 3 specific suggestions to improve search authority.\n\
             7. Provide a readability score from 0 to 100.\n\n\
             Return the result in JSON format.",
            title, content
        );

        let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generation_config": {
                "response_mime_type": "application/json",
                "response_schema": {
                    "type": "OBJECT",
                    "properties": {
                        "metaTitle": {"type": "STRING"},
                        "metaDescription": {"type": "STRING"},
                        "aeoSnippet": {"type": "STRING"},
                        "keywords": string_list,
                        "readabilityScore": {"type": "NUMBER"},
                        "entities": string_list,
                        "schemaJsonLd": {"type": "STRING"},
                        "suggestions": string_list
                    },
                    "required": ["metaTitle", "metaDescription", "aeoSnippet", "schemaJsonLd"]
                }
            }
        })
    }

    /// Concatenate the text parts of the first candidate.
    pub fn response_text(response_body: &Value) -> Result<String, AnalysisError> {
        let parts = response_body
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                AnalysisError::InvalidResponse("missing candidates[0].content.parts".to_string())
            })?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidResponse(
                "response contained no text".to_string(),
            ));
        }
        Ok(text)
    }

    async fn generate(&self, body: &Value) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnalysisError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AnalysisError::ProviderError(
                "Unauthorized: check GEMINI_API_KEY".to_string(),
            ));
        }

        if status.is_server_error() {
            return Err(AnalysisError::ProviderError(format!("Server error: {}", status)));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ProviderError(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::response_text(&response_body)
    }
}

#[async_trait]
impl ContentAnalyzer for GeminiAnalyzer {
    async fn categorize_study(
        &self,
        title: &str,
        description: &str,
    ) -> Result<StudyCategory, AnalysisError> {
        let text = self
            .generate(&Self::categorize_request_body(title, description))
            .await?;
        let label = text.trim();
        label
            .parse()
            .map_err(|_| AnalysisError::UnrecognizedLabel(label.to_string()))
    }

    async fn audit_seo(&self, content: &str, title: &str) -> Result<SeoAnalysis, AnalysisError> {
        let text = self.generate(&Self::audit_request_body(content, title)).await?;
        extract_json(&text)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
