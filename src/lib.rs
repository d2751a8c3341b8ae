//! # Article Verdict
//!
//! Credibility analysis for news articles of any length.
//!
//! An article is split into chunks of at most `max_words` words, every chunk
//! is scored by an external text-classification model, and the per-chunk
//! votes are reduced to one verdict with an average confidence and a short
//! explanation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐
//! │ Article  │──▶│ Chunker  │──▶│ Classifier │──▶│ Aggregate │──▶ AnalysisResult
//! │  text    │   │ (words)  │   │  (HTTP)    │   │  (vote)   │
//! └──────────┘   └──────────┘   └────────────┘   └───────────┘
//!                                                      │
//!                                  ┌───────────────────┤
//!                                  ▼                   ▼
//!                             ┌──────────┐       ┌──────────┐
//!                             │   CLI    │       │   HTTP   │
//!                             │(verdict) │       │ /analyze │
//!                             └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! verdict analyze --file article.txt
//! echo "Some article text" | verdict analyze --json
//! verdict sample --dataset data/news.csv
//! verdict serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chunk`] | Word-count chunking |
//! | [`analyze`] | Majority-vote aggregation and the [`analyze::Analyzer`] pipeline |
//! | [`classifier`] | Classifier trait and HTTP providers |
//! | [`models`] | Core data types |
//! | [`error`] | Analysis error type |
//! | [`config`] | TOML configuration parsing |
//! | [`dataset`] | CSV / JSON Lines article dataset |
//! | [`report`] | Text and JSON output |
//! | [`progress`] | Progress reporting on stderr |
//! | [`server`] | HTTP analysis API |

pub mod analyze;
pub mod chunk;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod progress;
pub mod report;
pub mod server;
