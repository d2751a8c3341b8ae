//! Article dataset for sampling.
//!
//! Two formats are read, chosen by file extension:
//!
//! - `.csv`: a header row naming `title`/`Title` and `text`/`Text` columns;
//!   other columns are ignored.
//! - anything else: JSON Lines, one article per line.
//!
//! ```text
//! title,Text,label
//! Senate passes budget,"WASHINGTON (Reuters) - ...",REAL
//!
//! {"title": "Senate passes budget", "text": "WASHINGTON (Reuters) - ..."}
//! ```
//!
//! Blank JSONL lines are ignored. Records without text (missing, empty, or
//! whitespace-only) are dropped at load time, so every index refers to an
//! analyzable article.

use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

use crate::models::Article;

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(default, alias = "Title")]
    title: Option<String>,
    #[serde(default, alias = "Text")]
    text: Option<String>,
}

/// In-memory list of articles, loaded once and reused.
#[derive(Debug, Clone)]
pub struct Dataset {
    articles: Vec<Article>,
}

impl Dataset {
    pub fn from_articles(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Load a `.csv` or JSON Lines file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let parsed = if is_csv {
            Self::parse_csv(&content)
        } else {
            Self::parse(&content)
        };
        let dataset =
            parsed.with_context(|| format!("Failed to parse dataset: {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            articles = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse JSON Lines content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line)
                .with_context(|| format!("line {}: invalid JSON record", line_no + 1))?;
            records.push(record);
        }
        Ok(Self::from_records(records))
    }

    /// Parse CSV content with a header row.
    pub fn parse_csv(content: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();
        for (row, record) in reader.deserialize::<Record>().enumerate() {
            let record = record.with_context(|| format!("row {}: invalid CSV record", row + 1))?;
            records.push(record);
        }
        Ok(Self::from_records(records))
    }

    fn from_records(records: Vec<Record>) -> Self {
        let total = records.len();
        let articles: Vec<Article> = records
            .into_iter()
            .filter_map(|record| match record.text {
                Some(text) if !text.trim().is_empty() => Some(Article {
                    title: record.title.filter(|t| !t.trim().is_empty()),
                    text,
                }),
                _ => None,
            })
            .collect();

        let dropped = total - articles.len();
        if dropped > 0 {
            tracing::debug!(dropped, "skipped dataset records without text");
        }

        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Article> {
        match self.articles.get(index) {
            Some(article) => Ok(article),
            None => bail!(
                "Dataset index {} out of range ({} articles)",
                index,
                self.articles.len()
            ),
        }
    }

    /// Pick one article uniformly at random.
    pub fn sample(&self) -> Result<&Article> {
        self.sample_with(&mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> Result<&Article> {
        if self.articles.is_empty() {
            bail!("Dataset is empty");
        }
        let index = rng.gen_range(0..self.articles.len());
        Ok(&self.articles[index])
    }
}

/// Collapse whitespace and shorten to at most `width` characters, cutting at
/// a word boundary and appending `...` when anything was dropped. Output
/// matches Python's `textwrap.shorten(text, width, placeholder="...")`.
pub fn preview(text: &str, width: usize) -> String {
    const PLACEHOLDER: &str = "...";

    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.len());
    let mut out = String::new();
    for word in words {
        let extra = if out.is_empty() { 0 } else { 1 };
        if out.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }

    if out.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        format!("{}{}", out, PLACEHOLDER)
    }
}
