//! Extraction and normalization of model replies.
//!
//! Models frequently wrap their JSON in prose or Markdown fences despite
//! being told not to. Extraction therefore tries a direct parse first and
//! falls back to the first fenced block holding a `{...}` object. Whatever
//! object comes out is then normalized into an [`AnalysisResult`] with every
//! field present.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::analysis::AnalysisResult;
use crate::finding::Finding;

/// Explanation used when the model omits one or returns an empty string.
pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";

/// Fenced block, optionally tagged `json`, whose body is a `{...}` object.
pub const FENCED_JSON_PATTERN: &str = r"```(?:json)?\s*(\{[\s\S]*?\})\s*```";

static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FENCED_JSON_PATTERN).expect("valid regex"));

/// Neither a direct parse nor fenced-block recovery produced a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse AI response as JSON")]
pub struct UnparsableModelResponse;

/// Turn raw model text into a fully populated [`AnalysisResult`].
///
/// `original_code` is substituted for a missing or empty `improvedCode`.
pub fn normalize_response(
    raw: &str,
    original_code: &str,
) -> Result<AnalysisResult, UnparsableModelResponse> {
    let object = extract_object(raw).ok_or(UnparsableModelResponse)?;
    Ok(normalize_object(&object, original_code))
}

/// Pull a JSON object out of `raw`, trying a direct parse before fences.
pub fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw.trim()) {
        return Some(obj);
    }

    let captured = FENCED_JSON_RE.captures(raw)?.get(1)?.as_str();
    match serde_json::from_str::<Value>(captured) {
        Ok(Value::Object(obj)) => {
            tracing::debug!("Recovered model JSON from fenced block");
            Some(obj)
        }
        _ => None,
    }
}

/// Apply field defaults to an already-extracted object.
pub fn normalize_object(object: &Map<String, Value>, original_code: &str) -> AnalysisResult {
    let findings = object
        .get("errors")
        .or_else(|| object.get("findings"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let finding = Finding::from_model_value(item);
                    if finding.is_none() {
                        tracing::warn!(element = %item, "Dropping non-object finding from model reply");
                    }
                    finding
                })
                .collect()
        })
        .unwrap_or_default();

    let improved_code = non_empty_str(object, "improvedCode").unwrap_or(original_code);
    let explanation = non_empty_str(object, "explanation").unwrap_or(DEFAULT_EXPLANATION);

    AnalysisResult {
        findings,
        improved_code: improved_code.to_string(),
        explanation: explanation.to_string(),
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
