//! Hugging Face Inference API classifier.

use async_trait::async_trait;

use super::{build_client, parse_predictions, send_with_retry, Classifier, LabelMap};
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::models::ClassificationResult;

const DEFAULT_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Classifier backed by a hosted text-classification model.
///
/// Calls `POST {url}/{model}` with `{"inputs": [...]}`. Sends
/// `Authorization: Bearer $HF_TOKEN` when the variable is set.
pub struct HuggingFaceClassifier {
    model: String,
    endpoint: String,
    token: Option<String>,
    max_retries: u32,
    labels: LabelMap,
    client: reqwest::Client,
}

impl HuggingFaceClassifier {
    pub fn new(config: &ClassifierConfig) -> anyhow::Result<Self> {
        if config.model.trim().is_empty() {
            anyhow::bail!("classifier.model required for huggingface provider");
        }

        let base = config.url.as_deref().unwrap_or(DEFAULT_URL);
        let endpoint = format!("{}/{}", base.trim_end_matches('/'), config.model);

        Ok(Self {
            model: config.model.clone(),
            endpoint,
            token: std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty()),
            max_retries: config.max_retries,
            labels: LabelMap::from_config(config),
            client: build_client(config)?,
        })
    }
}

#[async_trait]
impl Classifier for HuggingFaceClassifier {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.endpoint)
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<ClassificationResult>> {
        let body = serde_json::json!({ "inputs": texts });

        let json = send_with_retry(self.name(), self.max_retries, || {
            let request = self.client.post(&self.endpoint).json(&body);
            match &self.token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        })
        .await?;

        parse_predictions(&json, texts.len(), &self.labels)
    }
}
