//! Error types for the analysis pipeline.
//!
//! Every failure of a single [`analyze`](crate::analyze::Analyzer::analyze)
//! call maps onto one of three variants. Errors are terminal for the call
//! that raised them; nothing is retried here and no shared state is left
//! behind, so later calls are unaffected.
//!
//! Application glue (config loading, CLI, server startup) uses
//! [`anyhow::Result`] and wraps these with context where useful.

/// Result type for chunking, classification, and aggregation.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure of one analysis call.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The article produced no chunks (empty or whitespace-only text).
    #[error("Article text is empty: nothing to classify")]
    EmptyInput,

    /// The classifier failed, timed out, or returned a malformed result set.
    #[error("Classifier error: {message}")]
    Classifier { message: String },

    /// A pipeline setting is out of range (e.g. `max_words = 0`).
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl AnalysisError {
    /// Build a [`AnalysisError::Classifier`] from any displayable cause.
    pub fn classifier(message: impl Into<String>) -> Self {
        Self::Classifier {
            message: message.into(),
        }
    }

    /// Build an [`AnalysisError::InvalidConfiguration`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::EmptyInput => "empty_input",
            AnalysisError::Classifier { .. } => "classifier_error",
            AnalysisError::InvalidConfiguration { .. } => "invalid_configuration",
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::classifier(format!("request timed out: {}", err))
        } else {
            Self::classifier(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AnalysisError::EmptyInput.code(), "empty_input");
        assert_eq!(AnalysisError::classifier("x").code(), "classifier_error");
        assert_eq!(
            AnalysisError::invalid_config("x").code(),
            "invalid_configuration"
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = AnalysisError::invalid_config("chunking.max_words must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: chunking.max_words must be > 0"
        );
    }
}
