//! Analysis orchestration.
//!
//! [`Analyzer`] validates an [`AnalysisRequest`], renders the prompt, calls
//! the injected [`ModelClient`] once and normalizes the reply. Either a
//! complete [`AnalysisResult`] comes back or an [`AnalysisError`]; there is
//! no partial success.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::finding::Finding;
use crate::normalize::{normalize_response, UnparsableModelResponse};
use crate::preference::Preference;
use crate::prompt::build_prompt;

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// Body of an analysis request as received from the client.
///
/// Fields are optional here so a missing value can be reported as
/// [`AnalysisError::InvalidRequest`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    pub code: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "crate::preference::deserialize_lenient")]
    pub preference: Option<String>,
}

/// Normalized outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "errors")]
    pub findings: Vec<Finding>,
    pub improved_code: String,
    pub explanation: String,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest<'a> {
    pub code: &'a str,
    pub language: &'a str,
    pub preference: Preference,
}

impl AnalysisRequest {
    /// Check required fields and resolve the preference.
    pub fn validate(&self) -> Result<ValidatedRequest<'_>, AnalysisError> {
        let code = self.code.as_deref().filter(|c| !c.is_empty());
        let language = self.language.as_deref().filter(|l| !l.trim().is_empty());

        match (code, language) {
            (Some(code), Some(language)) => Ok(ValidatedRequest {
                code,
                language,
                preference: Preference::resolve(self.preference.as_deref()),
            }),
            _ => Err(AnalysisError::InvalidRequest(
                "Missing required fields: code and language are required".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Model client seam
// ---------------------------------------------------------------------------

/// Failure calling the completion service, carrying the provider's message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ModelCallError {
    pub message: String,
}

impl ModelCallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A text-completion service able to answer an analysis prompt.
///
/// Implementations send [`crate::prompt::SYSTEM_PROMPT`] alongside the
/// prompt and return the raw reply text. They must not retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Required input missing; the model was not called.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model call failed: {0}")]
    ModelCallFailed(#[from] ModelCallError),

    #[error(transparent)]
    UnparsableModelResponse(#[from] UnparsableModelResponse),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs the validate → prompt → model → normalize pipeline.
///
/// Cheap to clone; the model client is shared behind an `Arc`.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn ModelClient>,
}

impl Analyzer {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let validated = request.validate()?;

        let prompt = build_prompt(validated.code, validated.language, validated.preference);

        tracing::debug!(
            language = validated.language,
            preference = %validated.preference,
            code_len = validated.code.len(),
            "Requesting model analysis",
        );

        let raw = self.client.complete(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Model call failed");
            AnalysisError::ModelCallFailed(e)
        })?;

        let result = normalize_response(&raw, validated.code).map_err(|e| {
            tracing::error!(raw_len = raw.len(), "Model reply was not parsable JSON");
            AnalysisError::UnparsableModelResponse(e)
        })?;

        tracing::info!(
            language = validated.language,
            findings = result.findings.len(),
            "Analysis complete",
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;
    use crate::normalize::DEFAULT_EXPLANATION;

    /// Stub client returning a canned reply and recording every prompt.
    struct StubClient {
        reply: Result<String, ModelCallError>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(ModelCallError::new(message)),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for StubClient {
        async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn request(code: Option<&str>, language: Option<&str>, preference: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            code: code.map(str::to_string),
            language: language.map(str::to_string),
            preference: preference.map(str::to_string),
        }
    }

    const GOOD_REPLY: &str = r#"{"errors":[{"line":1,"type":"bug","message":"m"}],"improvedCode":"fixed","explanation":"why"}"#;

    #[test]
    fn omitted_preference_resolves_to_simple() {
        let req = request(Some("x"), Some("python"), None);
        assert_eq!(req.validate().unwrap().preference, Preference::Simple);
    }

    #[tokio::test]
    async fn missing_code_is_rejected_without_model_call() {
        let stub = StubClient::replying(GOOD_REPLY);
        let analyzer = Analyzer::new(stub.clone());

        for req in [
            request(None, Some("python"), None),
            request(Some(""), Some("python"), None),
        ] {
            assert_matches!(
                analyzer.analyze(&req).await,
                Err(AnalysisError::InvalidRequest(_))
            );
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn missing_language_is_rejected_without_model_call() {
        let stub = StubClient::replying(GOOD_REPLY);
        let analyzer = Analyzer::new(stub.clone());

        for req in [
            request(Some("x = 1"), None, None),
            request(Some("x = 1"), Some("  "), None),
        ] {
            assert_matches!(
                analyzer.analyze(&req).await,
                Err(AnalysisError::InvalidRequest(_))
            );
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn successful_analysis_calls_model_once() {
        let stub = StubClient::replying(GOOD_REPLY);
        let analyzer = Analyzer::new(stub.clone());

        let result = analyzer
            .analyze(&request(Some("x = 1"), Some("python"), Some("Optimized")))
            .await
            .unwrap();

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.improved_code, "fixed");
        assert_eq!(result.explanation, "why");

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("python"));
        assert!(prompts[0].contains(Preference::Optimized.description()));
    }

    #[tokio::test]
    async fn unknown_preference_uses_simple_description() {
        let stub = StubClient::replying(GOOD_REPLY);
        let analyzer = Analyzer::new(stub.clone());

        analyzer
            .analyze(&request(Some("x"), Some("go"), Some("Turbo")))
            .await
            .unwrap();

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains(Preference::Simple.description()));
    }

    #[tokio::test]
    async fn model_failure_propagates_provider_message() {
        let stub = StubClient::failing("Incorrect API key provided");
        let analyzer = Analyzer::new(stub);

        let err = analyzer
            .analyze(&request(Some("x"), Some("python"), None))
            .await
            .unwrap_err();

        assert_matches!(&err, AnalysisError::ModelCallFailed(e) if e.message == "Incorrect API key provided");
    }

    #[tokio::test]
    async fn unparsable_reply_is_reported() {
        let stub = StubClient::replying("not json at all");
        let analyzer = Analyzer::new(stub);

        assert_matches!(
            analyzer.analyze(&request(Some("x"), Some("python"), None)).await,
            Err(AnalysisError::UnparsableModelResponse(_))
        );
    }

    #[tokio::test]
    async fn empty_fields_default_against_original_code() {
        let stub = StubClient::replying(r#"{"errors":null}"#);
        let analyzer = Analyzer::new(stub);

        let result = analyzer
            .analyze(&request(Some("original"), Some("c"), None))
            .await
            .unwrap();

        assert!(result.findings.is_empty());
        assert_eq!(result.improved_code, "original");
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn result_serializes_with_wire_names() {
        let result = AnalysisResult {
            findings: vec![],
            improved_code: "a".into(),
            explanation: "b".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "errors": [], "improvedCode": "a", "explanation": "b" })
        );
    }
}
