//! Text and JSON rendering of analysis results.

use anyhow::Result;

use crate::dataset::preview;
use crate::models::{AnalysisResult, Article};

/// Width of the article preview printed before a sampled result.
pub const PREVIEW_WIDTH: usize = 500;

/// Fixed human-readable block for one result.
pub fn render_result(result: &AnalysisResult) -> String {
    format!(
        "=== Article Credibility Result ===\n\
         Prediction       : {}\n\
         Avg Confidence   : {:.2}%\n\
         Chunks Processed : {}\n\
         Explanation      : {}\n",
        result.verdict, result.confidence_percent, result.chunk_count, result.explanation
    )
}

/// Title, rule, and shortened body shown before a sampled article's result.
pub fn render_article_header(article: &Article) -> String {
    format!(
        "Title: {}\n{}\n{}\n",
        article.title.as_deref().unwrap_or("No Title"),
        "-".repeat(40),
        preview(&article.text, PREVIEW_WIDTH)
    )
}

/// Pretty JSON for one result; `title` is included when the article has one.
pub fn render_json(result: &AnalysisResult, title: Option<&str>) -> Result<String> {
    let mut value = serde_json::to_value(result)?;
    if let Some(title) = title {
        value["title"] = serde_json::Value::String(title.to_string());
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::aggregate;
    use crate::models::ClassificationResult;

    #[test]
    fn test_render_result_layout() {
        let result = aggregate(&[
            ClassificationResult::fabricated(0.9),
            ClassificationResult::fabricated(0.8),
            ClassificationResult::credible(0.6),
        ])
        .unwrap();
        let text = render_result(&result);
        assert_eq!(
            text,
            "=== Article Credibility Result ===\n\
             Prediction       : FABRICATED\n\
             Avg Confidence   : 76.67%\n\
             Chunks Processed : 3\n\
             Explanation      : This article has mixed signals. Please verify from trusted sources.\n"
        );
    }

    #[test]
    fn test_render_confidence_two_decimals() {
        let result = aggregate(&[ClassificationResult::credible(0.8)]).unwrap();
        assert!(render_result(&result).contains("Avg Confidence   : 80.00%"));
    }

    #[test]
    fn test_render_article_header_without_title() {
        let header = render_article_header(&Article::new("Body  text"));
        assert!(header.starts_with("Title: No Title\n"));
        assert!(header.ends_with("Body text\n"));
    }

    #[test]
    fn test_render_json_fields() {
        let result = aggregate(&[ClassificationResult::credible(0.8)]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&result, None).unwrap()).unwrap();
        assert_eq!(json["verdict"], "CREDIBLE");
        assert!(json.get("title").is_none());
        assert_eq!(json["chunk_count"], 1);
        assert_eq!(json["explanation"], "mixed_signals");
        assert_eq!(json["confidence_percent"], 80.0);
    }

    #[test]
    fn test_render_json_with_title() {
        let result = aggregate(&[ClassificationResult::fabricated(0.9)]).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&result, Some("Budget approved")).unwrap()).unwrap();
        assert_eq!(json["title"], "Budget approved");
        assert_eq!(json["verdict"], "FABRICATED");
    }
}
