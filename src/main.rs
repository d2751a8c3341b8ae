//! # Article Verdict CLI (`verdict`)
//!
//! ## Usage
//!
//! ```bash
//! verdict --config ./config/verdict.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `verdict analyze [TEXT]` | Analyze text from the argument, `--file`, or stdin |
//! | `verdict sample` | Analyze a random (or `--index`ed) article from the dataset |
//! | `verdict serve` | Start the HTTP analysis API |
//! | `verdict classifier` | Show the configured classifier |
//!
//! ## Examples
//!
//! ```bash
//! verdict analyze --file ./article.txt
//! curl -s https://example.com/story.txt | verdict analyze --json
//! verdict sample --dataset ./data/news.csv --index 42
//! RUST_LOG=article_verdict=debug verdict serve
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use article_verdict::analyze::Analyzer;
use article_verdict::classifier::{create_classifier, LabelMap};
use article_verdict::config::{self, Config};
use article_verdict::dataset::Dataset;
use article_verdict::models::{AnalysisResult, Article};
use article_verdict::progress::ProgressMode;
use article_verdict::{report, server};

const DEFAULT_CONFIG_PATH: &str = "./config/verdict.toml";

/// Article Verdict: chunked majority-vote credibility analysis for news
/// articles.
#[derive(Parser)]
#[command(
    name = "verdict",
    about = "Article Verdict: classify news articles as credible or fabricated",
    version,
    long_about = "Splits an article into word-bounded chunks, classifies each chunk with an \
    external text-classification model, and reduces the votes to a single verdict with an \
    average confidence and an explanation."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When the default path does not exist, built-in defaults are used.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a TTY, `off` otherwise.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one article.
    ///
    /// Reads the article from TEXT, from --file, or from stdin when neither
    /// is given.
    Analyze {
        /// Article text.
        text: Option<String>,

        /// Read the article from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Article title (logged, and shown with --json).
        #[arg(long)]
        title: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Analyze an article from the dataset.
    ///
    /// Picks a random article unless --index is given, prints its title and
    /// a short preview, then the result.
    Sample {
        /// `.csv` or JSON Lines dataset; overrides `[dataset].path`.
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Zero-based article index instead of a random pick.
        #[arg(long)]
        index: Option<usize>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP analysis API.
    ///
    /// Binds to `[server].bind` and serves `POST /analyze` and `GET /health`.
    Serve,

    /// Show the configured classifier provider, model, and label mapping.
    Classifier,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Config> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::minimal());
    }
    config::load_config(path)
}

fn read_article_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read article: {}", path.display()));
    }
    if atty::is(atty::Stream::Stdin) {
        eprintln!("Paste your news article, then press Ctrl-D:");
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read article from stdin")?;
    Ok(buf)
}

fn print_result(result: &AnalysisResult, article: &Article, json: bool) -> Result<()> {
    if json {
        println!("{}", report::render_json(result, article.title.as_deref())?);
    } else {
        println!();
        print!("{}", report::render_result(result));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cfg = load(&cli.config)?;

    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);

    match cli.command {
        Commands::Analyze {
            text,
            file,
            title,
            json,
        } => {
            let article = Article {
                title,
                text: read_article_text(text, file)?,
            };
            let classifier = create_classifier(&cfg.classifier)?;
            let analyzer =
                Analyzer::from_config(&cfg, classifier).with_progress(progress.reporter());
            let result = analyzer.analyze_article(&article).await?;
            print_result(&result, &article, json)?;
        }
        Commands::Sample {
            dataset,
            index,
            json,
        } => {
            let path = dataset.or_else(|| cfg.dataset.path.clone()).context(
                "No dataset configured. Pass --dataset or set [dataset] path in config.",
            )?;
            let dataset = Dataset::load(&path)?;
            let article = match index {
                Some(i) => dataset.get(i)?,
                None => dataset.sample()?,
            };

            if !json {
                println!();
                print!("{}", report::render_article_header(article));
            }

            let classifier = create_classifier(&cfg.classifier)?;
            let analyzer =
                Analyzer::from_config(&cfg, classifier).with_progress(progress.reporter());
            let result = analyzer.analyze_article(article).await?;
            print_result(&result, article, json)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Classifier => {
            let classifier = create_classifier(&cfg.classifier)?;
            println!("Provider:          {}", classifier.name());
            if !classifier.model_name().is_empty() {
                println!("Model:             {}", classifier.model_name());
            }
            if let Some(endpoint) = classifier.endpoint() {
                println!("Endpoint:          {}", endpoint);
            }
            let labels = LabelMap::from_config(&cfg.classifier);
            println!("Fabricated labels: {}", labels.fabricated().join(", "));
            println!("Credible labels:   {}", labels.credible().join(", "));
            println!("Max words/chunk:   {}", cfg.chunking.max_words);
            println!("Batch size:        {}", cfg.analysis.batch_size);
        }
    }

    Ok(())
}
