//! text-embeddings-inference (`/predict`) classifier.

use async_trait::async_trait;

use super::{build_client, parse_predictions, send_with_retry, Classifier, LabelMap};
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::models::ClassificationResult;

const DEFAULT_URL: &str = "http://localhost:8080";

/// Classifier backed by a self-hosted TEI server running a
/// sequence-classification model.
///
/// TEI reads a bare two-element string list as a sentence pair, so a batch
/// is sent as one single-element list per text: `{"inputs": [["a"], ["b"]]}`.
pub struct TeiClassifier {
    model: String,
    endpoint: String,
    max_retries: u32,
    labels: LabelMap,
    client: reqwest::Client,
}

impl TeiClassifier {
    pub fn new(config: &ClassifierConfig) -> anyhow::Result<Self> {
        let base = config.url.as_deref().unwrap_or(DEFAULT_URL);

        Ok(Self {
            model: config.model.clone(),
            endpoint: format!("{}/predict", base.trim_end_matches('/')),
            max_retries: config.max_retries,
            labels: LabelMap::from_config(config),
            client: build_client(config)?,
        })
    }
}

#[async_trait]
impl Classifier for TeiClassifier {
    fn name(&self) -> &str {
        "tei"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.endpoint)
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<ClassificationResult>> {
        let inputs: Vec<[&str; 1]> = texts.iter().map(|t| [t.as_str()]).collect();
        let body = serde_json::json!({
            "inputs": inputs,
            "truncate": true,
        });

        let json = send_with_retry(self.name(), self.max_retries, || {
            self.client.post(&self.endpoint).json(&body)
        })
        .await?;

        parse_predictions(&json, texts.len(), &self.labels)
    }
}
