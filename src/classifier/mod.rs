//! Classifier capability and provider implementations.
//!
//! Defines the [`Classifier`] trait and concrete implementations:
//! - **[`DisabledClassifier`]**: returns errors; used when no provider is configured.
//! - **[`HuggingFaceClassifier`]**: calls the Hugging Face Inference API for a
//!   text-classification model.
//! - **[`TeiClassifier`]**: calls a self-hosted text-embeddings-inference
//!   server's `/predict` endpoint.
//!
//! # Contract
//!
//! `classify` maps N input texts to exactly N [`ClassificationResult`]s in
//! input order. Raw model labels (`LABEL_0`, `FAKE`, ...) are resolved to the
//! two-valued [`Label`] through a [`LabelMap`]; a label that maps to neither
//! side is a malformed response.
//!
//! # Retry Strategy
//!
//! The HTTP providers retry transient errors with exponential backoff; the
//! analysis pipeline itself never retries.
//! - HTTP 429 (rate limited) and 5xx (server error / model loading) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

mod huggingface;
mod tei;

pub use huggingface::HuggingFaceClassifier;
pub use tei::TeiClassifier;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClassifierConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{ClassificationResult, Label};

/// An external text classifier.
///
/// Implementations are constructed once and shared (`Arc`) across analysis
/// calls; they must not keep per-call state.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Provider identifier (e.g. `"huggingface"`).
    fn name(&self) -> &str;

    /// Model identifier, if the provider has one.
    fn model_name(&self) -> &str {
        ""
    }

    /// Remote endpoint, for HTTP-backed providers.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    /// Classify a batch of texts, returning one result per text in order.
    async fn classify(&self, texts: &[String]) -> Result<Vec<ClassificationResult>>;
}

// ============ Label mapping ============

/// Maps raw model labels onto [`Label`]. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct LabelMap {
    fabricated: Vec<String>,
    credible: Vec<String>,
}

impl LabelMap {
    pub fn new<I, J, S, T>(fabricated: I, credible: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            fabricated: fabricated.into_iter().map(Into::into).collect(),
            credible: credible.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.fabricated_labels.iter().cloned(),
            config.credible_labels.iter().cloned(),
        )
    }

    pub fn fabricated(&self) -> &[String] {
        &self.fabricated
    }

    pub fn credible(&self) -> &[String] {
        &self.credible
    }

    pub fn resolve(&self, raw: &str) -> Result<Label> {
        let raw = raw.trim();
        if self.fabricated.iter().any(|l| l.eq_ignore_ascii_case(raw)) {
            Ok(Label::Fabricated)
        } else if self.credible.iter().any(|l| l.eq_ignore_ascii_case(raw)) {
            Ok(Label::Credible)
        } else {
            Err(AnalysisError::classifier(format!(
                "unknown label '{}' (expected one of {:?} or {:?})",
                raw, self.fabricated, self.credible
            )))
        }
    }
}

// ============ Disabled ============

/// A no-op classifier that always fails.
///
/// Used when `classifier.provider = "disabled"` in the configuration.
pub struct DisabledClassifier;

#[async_trait]
impl Classifier for DisabledClassifier {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn classify(&self, _texts: &[String]) -> Result<Vec<ClassificationResult>> {
        Err(AnalysisError::classifier(
            "classifier provider is disabled; set [classifier] provider in config",
        ))
    }
}

/// Create the configured [`Classifier`].
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledClassifier`] |
/// | `"huggingface"` | [`HuggingFaceClassifier`] |
/// | `"tei"` | [`TeiClassifier`] |
pub fn create_classifier(config: &ClassifierConfig) -> anyhow::Result<Arc<dyn Classifier>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledClassifier)),
        "huggingface" => Ok(Arc::new(HuggingFaceClassifier::new(config)?)),
        "tei" => Ok(Arc::new(TeiClassifier::new(config)?)),
        other => anyhow::bail!("Unknown classifier provider: {}", other),
    }
}

// ============ Shared HTTP plumbing ============

pub(crate) fn build_client(config: &ClassifierConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request built by `build`, retrying 429/5xx/network errors.
pub(crate) async fn send_with_retry<F>(
    provider: &str,
    max_retries: u32,
    build: F,
) -> Result<Value>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tracing::debug!(provider, attempt, ?delay, "retrying classifier request");
            tokio::time::sleep(delay).await;
        }

        match build().send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return response.json::<Value>().await.map_err(|e| {
                        AnalysisError::classifier(format!(
                            "invalid {} response body: {}",
                            provider, e
                        ))
                    });
                }

                let body_text = response.text().await.unwrap_or_default();

                if status.as_u16() == 429 || status.is_server_error() {
                    tracing::warn!(provider, %status, "classifier request failed, will retry");
                    last_err = Some(AnalysisError::classifier(format!(
                        "{} API error {}: {}",
                        provider, status, body_text
                    )));
                    continue;
                }

                return Err(AnalysisError::classifier(format!(
                    "{} API error {}: {}",
                    provider, status, body_text
                )));
            }
            Err(e) => {
                tracing::warn!(provider, error = %e, "classifier request failed, will retry");
                last_err = Some(e.into());
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        AnalysisError::classifier(format!("{} classification failed after retries", provider))
    }))
}

/// Parse a text-classification response.
///
/// Accepts an array with one entry per input, where each entry is either a
/// single `{label, score}` object or a list of them (all labels, any order);
/// for lists the top-scoring candidate wins. A flat list of objects for a
/// single input is treated as that input's candidates.
pub(crate) fn parse_predictions(
    json: &Value,
    expected: usize,
    labels: &LabelMap,
) -> Result<Vec<ClassificationResult>> {
    if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
        return Err(AnalysisError::classifier(message.to_string()));
    }

    let entries = json
        .as_array()
        .ok_or_else(|| AnalysisError::classifier("invalid response: expected a JSON array"))?;

    let flat_single = expected == 1 && entries.len() > 1 && entries.iter().all(Value::is_object);
    if flat_single {
        return Ok(vec![best_candidate(entries, labels)?]);
    }

    if entries.len() != expected {
        return Err(AnalysisError::classifier(format!(
            "classifier returned {} results for {} inputs",
            entries.len(),
            expected
        )));
    }

    entries
        .iter()
        .map(|entry| match entry {
            Value::Array(candidates) => best_candidate(candidates, labels),
            Value::Object(_) => parse_candidate(entry, labels),
            _ => Err(AnalysisError::classifier(
                "invalid response: prediction is neither an object nor a list",
            )),
        })
        .collect()
}

fn best_candidate(candidates: &[Value], labels: &LabelMap) -> Result<ClassificationResult> {
    let mut best: Option<ClassificationResult> = None;
    for candidate in candidates {
        let parsed = parse_candidate(candidate, labels)?;
        if best.map_or(true, |b| parsed.score > b.score) {
            best = Some(parsed);
        }
    }
    best.ok_or_else(|| AnalysisError::classifier("invalid response: empty prediction list"))
}

fn parse_candidate(value: &Value, labels: &LabelMap) -> Result<ClassificationResult> {
    let raw_label = value
        .get("label")
        .and_then(|l| l.as_str())
        .ok_or_else(|| AnalysisError::classifier("invalid response: missing label"))?;
    let score = value
        .get("score")
        .and_then(|s| s.as_f64())
        .ok_or_else(|| AnalysisError::classifier("invalid response: missing score"))?;

    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(AnalysisError::classifier(format!(
            "invalid response: score {} outside [0, 1]",
            score
        )));
    }

    Ok(ClassificationResult::new(labels.resolve(raw_label)?, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels() -> LabelMap {
        LabelMap::new(["LABEL_1"], ["LABEL_0"])
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let map = LabelMap::new(["FAKE"], ["REAL"]);
        assert_eq!(map.resolve("fake").unwrap(), Label::Fabricated);
        assert_eq!(map.resolve(" Real ").unwrap(), Label::Credible);
        assert!(map.resolve("SATIRE").is_err());
    }

    #[test]
    fn test_label_map_from_config_defaults() {
        let map = LabelMap::from_config(&ClassifierConfig::default());
        assert_eq!(map.fabricated(), ["LABEL_1", "FAKE"]);
        assert_eq!(map.credible(), ["LABEL_0", "REAL"]);
    }

    #[test]
    fn test_parse_one_object_per_input() {
        let json = json!([
            {"label": "LABEL_1", "score": 0.9},
            {"label": "LABEL_0", "score": 0.6}
        ]);
        let results = parse_predictions(&json, 2, &labels()).unwrap();
        assert_eq!(
            results,
            vec![
                ClassificationResult::fabricated(0.9),
                ClassificationResult::credible(0.6)
            ]
        );
    }

    #[test]
    fn test_parse_nested_lists_takes_top_score() {
        let json = json!([
            [{"label": "LABEL_0", "score": 0.3}, {"label": "LABEL_1", "score": 0.7}],
            [{"label": "LABEL_0", "score": 0.8}, {"label": "LABEL_1", "score": 0.2}]
        ]);
        let results = parse_predictions(&json, 2, &labels()).unwrap();
        assert_eq!(results[0], ClassificationResult::fabricated(0.7));
        assert_eq!(results[1], ClassificationResult::credible(0.8));
    }

    #[test]
    fn test_parse_flat_list_for_single_input() {
        let json = json!([
            {"label": "LABEL_1", "score": 0.15},
            {"label": "LABEL_0", "score": 0.85}
        ]);
        let results = parse_predictions(&json, 1, &labels()).unwrap();
        assert_eq!(results, vec![ClassificationResult::credible(0.85)]);
    }

    #[test]
    fn test_parse_length_mismatch() {
        let json = json!([{"label": "LABEL_1", "score": 0.9}]);
        let err = parse_predictions(&json, 3, &labels()).unwrap_err();
        assert!(err.to_string().contains("1 results for 3 inputs"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_score() {
        let json = json!([{"label": "LABEL_1", "score": 1.5}]);
        assert!(parse_predictions(&json, 1, &labels()).is_err());
    }

    #[test]
    fn test_parse_surfaces_api_error_message() {
        let json = json!({"error": "Model is currently loading"});
        let err = parse_predictions(&json, 1, &labels()).unwrap_err();
        assert!(err.to_string().contains("currently loading"));
    }

    #[tokio::test]
    async fn test_disabled_classifier_fails() {
        let err = DisabledClassifier
            .classify(&["text".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Classifier { .. }));
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = ClassifierConfig {
            provider: "magic".to_string(),
            ..ClassifierConfig::default()
        };
        assert!(create_classifier(&config).is_err());
    }
}
