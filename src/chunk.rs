//! Word-count text chunker.
//!
//! Splits article text into [`Chunk`]s of at most `max_words` whitespace
//! tokens. Whitespace runs are collapsed: each chunk is its tokens rejoined
//! with single spaces.
//!
//! # Algorithm
//!
//! 1. Tokenize on Unicode whitespace (`str::split_whitespace`).
//! 2. Partition the tokens into consecutive groups of `max_words`.
//! 3. Rejoin each group with `' '`.
//!
//! Only the final chunk may hold fewer than `max_words` tokens. Empty or
//! whitespace-only text yields zero chunks; callers that need at least one
//! chunk must treat that as an error.
//!
//! # Example
//!
//! ```rust
//! use article_verdict::chunk::split_into_chunks;
//!
//! let chunks = split_into_chunks("one  two\nthree four five", 2).unwrap();
//! let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
//! assert_eq!(texts, vec!["one two", "three four", "five"]);
//! ```

use crate::error::{AnalysisError, Result};
use crate::models::Chunk;

/// Default chunk size in words.
pub const DEFAULT_MAX_WORDS: usize = 200;

/// Split text into chunks of at most `max_words` tokens.
///
/// Returns chunks with contiguous indices starting at 0.
///
/// # Errors
///
/// [`AnalysisError::InvalidConfiguration`] when `max_words` is zero.
pub fn split_into_chunks(text: &str, max_words: usize) -> Result<Vec<Chunk>> {
    if max_words == 0 {
        return Err(AnalysisError::invalid_config(
            "max_words must be a positive integer",
        ));
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    Ok(words
        .chunks(max_words)
        .enumerate()
        .map(|(index, group)| Chunk {
            index,
            text: group.join(" "),
            word_count: group.len(),
        })
        .collect())
}

/// Chunk texts in order, ready to hand to a classifier.
pub fn chunk_texts(chunks: &[Chunk]) -> Vec<String> {
    chunks.iter().map(|c| c.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(chunks: &[Chunk]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|c| c.text.split(' ').map(str::to_string))
            .collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let text = "a ".repeat(50);
        let chunks = split_into_chunks(&text, DEFAULT_MAX_WORDS).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count, 50);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_long_text_splits_200_200_50() {
        let text = "a ".repeat(450);
        let chunks = split_into_chunks(&text, DEFAULT_MAX_WORDS).unwrap();
        let counts: Vec<usize> = chunks.iter().map(|c| c.word_count).collect();
        assert_eq!(counts, vec![200, 200, 50]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let text = "w ".repeat(400);
        let chunks = split_into_chunks(&text, 200).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.word_count == 200));
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(split_into_chunks("", 200).unwrap().is_empty());
        assert!(split_into_chunks(" \n\t  ", 200).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_collapsed() {
        let chunks = split_into_chunks("  Breaking:\n\nmarkets   rally\ttoday  ", 200).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Breaking: markets rally today");
    }

    #[test]
    fn test_tokens_reconstructed_in_order() {
        let text = (0..1037)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join("  \n");
        for max_words in [1, 2, 7, 200, 1037, 5000] {
            let chunks = split_into_chunks(&text, max_words).unwrap();
            let original: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            assert_eq!(tokens(&chunks), original, "max_words={}", max_words);

            let (last, rest) = chunks.split_last().unwrap();
            assert!(rest.iter().all(|c| c.word_count == max_words));
            assert!(last.word_count >= 1 && last.word_count <= max_words);
        }
    }

    #[test]
    fn test_indices_contiguous() {
        let text = "x ".repeat(95);
        let chunks = split_into_chunks(&text, 10).unwrap();
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn test_zero_max_words_rejected() {
        let err = split_into_chunks("hello", 0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha beta gamma delta epsilon zeta eta theta";
        let c1 = split_into_chunks(text, 3).unwrap();
        let c2 = split_into_chunks(text, 3).unwrap();
        assert_eq!(c1, c2);
    }
}
