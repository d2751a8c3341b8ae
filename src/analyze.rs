//! Chunked majority-vote analysis.
//!
//! [`Analyzer::analyze`] runs the full pipeline for one article:
//!
//! ```text
//! text ──▶ split_into_chunks ──▶ classify (batched) ──▶ aggregate ──▶ AnalysisResult
//! ```
//!
//! # Aggregation rules
//!
//! - `fake_count` is the number of chunks labelled fabricated, `real_count`
//!   the rest.
//! - Verdict is [`Verdict::Fabricated`] iff `fake_count > real_count`; a tie
//!   is [`Verdict::Credible`].
//! - Confidence is the mean chunk score × 100, rounded to 2 decimals with
//!   [`f64::round`] (half away from zero).
//! - Explanation, first match wins: margin `<= 1` → mixed signals;
//!   fabricated → misinformation; otherwise trustworthy. A one-chunk margin
//!   is reported as mixed even though the vote still picks a side.
//!
//! The analyzer owns no per-call state. Construct it once with its
//! classifier and share it (e.g. behind an `Arc`) between concurrent calls.

use std::sync::Arc;
use std::time::Duration;

use crate::chunk::{chunk_texts, split_into_chunks, DEFAULT_MAX_WORDS};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::models::{
    AnalysisResult, Article, Chunk, ClassificationResult, Explanation, Label, Verdict,
};
use crate::progress::{NoProgress, ProgressEvent, ProgressReporter};

const DEFAULT_BATCH_SIZE: usize = 16;

/// Vote counts over a set of chunk classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub fake_count: usize,
    pub real_count: usize,
}

impl Tally {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let fake_count = results
            .iter()
            .filter(|r| r.label == Label::Fabricated)
            .count();
        Self {
            fake_count,
            real_count: results.len() - fake_count,
        }
    }

    pub fn total(&self) -> usize {
        self.fake_count + self.real_count
    }

    /// `|fake_count - real_count|`.
    pub fn margin(&self) -> usize {
        self.fake_count.abs_diff(self.real_count)
    }

    pub fn verdict(&self) -> Verdict {
        if self.fake_count > self.real_count {
            Verdict::Fabricated
        } else {
            Verdict::Credible
        }
    }

    pub fn explanation(&self) -> Explanation {
        if self.margin() <= 1 {
            Explanation::MixedSignals
        } else if self.verdict() == Verdict::Fabricated {
            Explanation::Misinformation
        } else {
            Explanation::Trustworthy
        }
    }
}

/// Mean score as a percentage rounded to 2 decimals, or `None` for no results.
pub fn confidence_percent(results: &[ClassificationResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let mean = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
    Some(round_2dp(mean * 100.0))
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reduce per-chunk classifications into one [`AnalysisResult`].
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] when `results` is empty.
pub fn aggregate(results: &[ClassificationResult]) -> Result<AnalysisResult> {
    let confidence = confidence_percent(results).ok_or(AnalysisError::EmptyInput)?;
    let tally = Tally::from_results(results);
    let explanation = tally.explanation();

    Ok(AnalysisResult {
        chunk_count: tally.total(),
        verdict: tally.verdict(),
        confidence_percent: confidence,
        explanation,
        explanation_text: explanation.message(),
        fake_count: tally.fake_count,
        real_count: tally.real_count,
    })
}

/// Chunks an article, classifies every chunk, and aggregates the votes.
pub struct Analyzer {
    classifier: Arc<dyn Classifier>,
    max_words: usize,
    batch_size: usize,
    timeout: Option<Duration>,
    progress: Box<dyn ProgressReporter>,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            max_words: DEFAULT_MAX_WORDS,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: None,
            progress: Box::new(NoProgress),
        }
    }

    /// Build an analyzer with chunking and batching settings from `config`.
    pub fn from_config(config: &Config, classifier: Arc<dyn Classifier>) -> Self {
        let analyzer = Self::new(classifier)
            .with_max_words(config.chunking.max_words)
            .with_batch_size(config.analysis.batch_size);
        match config.analysis.timeout_secs {
            Some(secs) => analyzer.with_timeout(Duration::from_secs(secs)),
            None => analyzer,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Bound each classifier call; expiry surfaces as a classifier error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Analyze raw article text.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidConfiguration`] for `max_words = 0` or `batch_size = 0`.
    /// - [`AnalysisError::EmptyInput`] when the text has no words.
    /// - [`AnalysisError::Classifier`] when any classifier call fails, times
    ///   out, or returns the wrong number of results.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if self.batch_size == 0 {
            return Err(AnalysisError::invalid_config(
                "batch_size must be a positive integer",
            ));
        }

        let chunks = split_into_chunks(text, self.max_words)?;
        if chunks.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        tracing::debug!(
            chunks = chunks.len(),
            max_words = self.max_words,
            classifier = self.classifier.name(),
            "article chunked"
        );
        self.progress.report(ProgressEvent::Chunked {
            chunks: chunks.len(),
        });

        let results = self.classify_chunks(&chunks).await?;
        let result = aggregate(&results)?;

        tracing::info!(
            chunks = result.chunk_count,
            fake = result.fake_count,
            real = result.real_count,
            verdict = %result.verdict,
            confidence = result.confidence_percent,
            "analysis complete"
        );

        Ok(result)
    }

    /// Analyze an [`Article`], logging its title.
    pub async fn analyze_article(&self, article: &Article) -> Result<AnalysisResult> {
        tracing::debug!(
            title = article.title.as_deref().unwrap_or("No Title"),
            "analyzing article"
        );
        self.analyze(&article.text).await
    }

    /// Classify chunks in order, one classifier call per batch.
    async fn classify_chunks(&self, chunks: &[Chunk]) -> Result<Vec<ClassificationResult>> {
        let texts = chunk_texts(chunks);
        let total = texts.len();
        let mut results = Vec::with_capacity(total);

        for batch in texts.chunks(self.batch_size) {
            let batch_results = self.classify_batch(batch).await?;
            if batch_results.len() != batch.len() {
                return Err(AnalysisError::classifier(format!(
                    "classifier returned {} results for {} chunks",
                    batch_results.len(),
                    batch.len()
                )));
            }
            results.extend(batch_results);
            self.progress.report(ProgressEvent::Classifying {
                n: results.len(),
                total,
            });
        }

        Ok(results)
    }

    async fn classify_batch(&self, batch: &[String]) -> Result<Vec<ClassificationResult>> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.classifier.classify(batch))
                .await
                .map_err(|_| {
                    AnalysisError::classifier(format!(
                        "classifier call timed out after {:?}",
                        limit
                    ))
                })?,
            None => self.classifier.classify(batch).await,
        }
    }
}
