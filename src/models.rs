//! Core data models used throughout the pipeline.
//!
//! These types represent the article, its chunks, the classifier's per-chunk
//! output, and the final aggregated verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An article submitted for analysis.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Article {
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default, alias = "Text")]
    pub text: String,
}

impl Article {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: None,
            text: text.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A contiguous run of at most `max_words` whitespace tokens, rejoined with
/// single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

/// Two-valued classifier label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Fabricated,
    Credible,
}

/// Classifier output for a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Model confidence in `[0, 1]`.
    pub score: f64,
}

impl ClassificationResult {
    pub fn new(label: Label, score: f64) -> Self {
        Self { label, score }
    }

    pub fn fabricated(score: f64) -> Self {
        Self::new(Label::Fabricated, score)
    }

    pub fn credible(score: f64) -> Self {
        Self::new(Label::Credible, score)
    }
}

/// Overall verdict for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Fabricated,
    Credible,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Fabricated => f.write_str("FABRICATED"),
            Verdict::Credible => f.write_str("CREDIBLE"),
        }
    }
}

/// Human-readable explanation category.
///
/// Ties and one-chunk margins are reported as [`Explanation::MixedSignals`]
/// regardless of which way the vote went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Explanation {
    MixedSignals,
    Misinformation,
    Trustworthy,
}

impl Explanation {
    pub fn message(&self) -> &'static str {
        match self {
            Explanation::MixedSignals => {
                "This article has mixed signals. Please verify from trusted sources."
            }
            Explanation::Misinformation => {
                "The model detected strong patterns of misinformation or unreliability."
            }
            Explanation::Trustworthy => {
                "The article seems consistent with trustworthy news patterns."
            }
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Final, immutable result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub chunk_count: usize,
    pub verdict: Verdict,
    /// Mean chunk score as a percentage, rounded to 2 decimals.
    pub confidence_percent: f64,
    pub explanation: Explanation,
    /// The explanation's display text.
    pub explanation_text: &'static str,
    pub fake_count: usize,
    pub real_count: usize,
}
