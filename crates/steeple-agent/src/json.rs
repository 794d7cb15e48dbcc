// ABOUTME: Lenient JSON extraction from model output that may wrap the payload in prose or code fences.
// ABOUTME: Tries the whole text, then a fenced block, then the outermost braces.

use serde::de::DeserializeOwned;

use crate::analyzer::AnalysisError;

/// Parse JSON from model output using a 3-tier strategy:
/// 1. Try parsing the entire text as JSON
/// 2. Strip markdown code fences and try again
/// 3. Find the first `{` to last `}` and try that substring
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, AnalysisError> {
    if let Ok(result) = serde_json::from_str::<T>(text) {
        return Ok(result);
    }

    let stripped = strip_code_fences(text);
    if let Ok(result) = serde_json::from_str::<T>(&stripped) {
        return Ok(result);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
        && let Ok(result) = serde_json::from_str::<T>(&text[start..=end])
    {
        return Ok(result);
    }

    Err(AnalysisError::InvalidResponse(
        "model output did not contain the expected JSON".to_string(),
    ))
}

/// Keep only the lines inside markdown code fences, or the whole text if
/// there are none.
fn strip_code_fences(text: &str) -> String {
    let mut inside = Vec::new();
    let mut in_fence = false;
    let mut saw_fence = false;

    for line in text.lines() {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            saw_fence = true;
            continue;
        }
        if in_fence {
            inside.push(line);
        }
    }

    if saw_fence {
        inside.join("\n")
    } else {
        text.to_string()
    }
}
