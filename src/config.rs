//! TOML configuration.
//!
//! Every section is optional; omitted fields fall back to the defaults
//! below, so an empty file is a valid (if classifier-less) configuration.
//!
//! ```toml
//! [chunking]
//! max_words = 200
//!
//! [analysis]
//! batch_size = 16
//! timeout_secs = 120
//!
//! [classifier]
//! provider = "huggingface"
//! model = "mrm8488/bert-tiny-finetuned-fake-news-detection"
//! fabricated_labels = ["LABEL_1"]
//! credible_labels = ["LABEL_0"]
//!
//! [dataset]
//! path = "./data/news.csv"
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chunk::DEFAULT_MAX_WORDS;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Chunks sent per classifier call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Upper bound on a single classifier call, enforced by the analyzer.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            timeout_secs: None,
        }
    }
}

fn default_batch_size() -> usize {
    16
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL; provider-specific default when unset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_fabricated_labels")]
    pub fabricated_labels: Vec<String>,
    #[serde(default = "default_credible_labels")]
    pub credible_labels: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            fabricated_labels: default_fabricated_labels(),
            credible_labels: default_credible_labels(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "mrm8488/bert-tiny-finetuned-fake-news-detection".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_fabricated_labels() -> Vec<String> {
    vec!["LABEL_1".to_string(), "FAKE".to_string()]
}
fn default_credible_labels() -> Vec<String> {
    vec!["LABEL_0".to_string(), "REAL".to_string()]
}

impl ClassifierConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Check ranges and provider names.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_words == 0 {
            anyhow::bail!("chunking.max_words must be > 0");
        }

        if self.analysis.batch_size == 0 {
            anyhow::bail!("analysis.batch_size must be > 0");
        }

        if self.analysis.timeout_secs == Some(0) {
            anyhow::bail!("analysis.timeout_secs must be > 0 when set");
        }

        match self.classifier.provider.as_str() {
            "disabled" | "huggingface" | "tei" => {}
            other => anyhow::bail!(
                "Unknown classifier provider: '{}'. Must be disabled, huggingface, or tei.",
                other
            ),
        }

        if self.classifier.is_enabled() {
            if self.classifier.fabricated_labels.is_empty() {
                anyhow::bail!("classifier.fabricated_labels must not be empty");
            }
            if self.classifier.credible_labels.is_empty() {
                anyhow::bail!("classifier.credible_labels must not be empty");
            }
            let overlap = self.classifier.fabricated_labels.iter().find(|f| {
                self.classifier
                    .credible_labels
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(f))
            });
            if let Some(label) = overlap {
                anyhow::bail!(
                    "classifier label '{}' is listed as both fabricated and credible",
                    label
                );
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
