//! HTTP API tests: the server runs in-process with a scripted classifier.

use article_verdict::classifier::Classifier;
use article_verdict::config::Config;
use article_verdict::error::{AnalysisError, Result};
use article_verdict::models::ClassificationResult;
use article_verdict::server::run_server_with_classifier;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Labels a chunk fake when it mentions "hoax"; fake 0.9, credible 0.7.
struct KeywordClassifier;

#[async_trait]
impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<ClassificationResult>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("hoax") {
                    ClassificationResult::fabricated(0.9)
                } else {
                    ClassificationResult::credible(0.7)
                }
            })
            .collect())
    }
}

struct BrokenClassifier;

#[async_trait]
impl Classifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    async fn classify(&self, _texts: &[String]) -> Result<Vec<ClassificationResult>> {
        Err(AnalysisError::classifier("model unavailable"))
    }
}

fn test_config(port: u16) -> Config {
    toml::from_str(&format!(
        r#"
[chunking]
max_words = 3

[server]
bind = "127.0.0.1:{}"
"#,
        port
    ))
    .unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start(classifier: Arc<dyn Classifier>) -> (u16, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let cfg = test_config(port);
    let handle = tokio::spawn(async move {
        run_server_with_classifier(&cfg, classifier).await.ok();
    });
    wait_for_server(port).await;
    (port, handle)
}

#[tokio::test]
async fn test_health_reports_classifier() {
    let (port, handle) = start(Arc::new(KeywordClassifier)).await;

    let body: Value = reqwest::get(format!("http://127.0.0.1:{}/health", port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier"], "keyword");

    handle.abort();
}

#[tokio::test]
async fn test_analyze_majority_vote() {
    let (port, handle) = start(Arc::new(KeywordClassifier)).await;
    let client = reqwest::Client::new();

    // max_words = 3 → four chunks, three of them mention a hoax.
    let resp = client
        .post(format!("http://127.0.0.1:{}/analyze", port))
        .json(&json!({
            "title": "Viral claim",
            "text": "a hoax here another hoax here third hoax here all fine here"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["chunk_count"], 4);
    assert_eq!(body["fake_count"], 3);
    assert_eq!(body["real_count"], 1);
    assert_eq!(body["verdict"], "FABRICATED");
    assert_eq!(body["explanation"], "misinformation");
    assert_eq!(body["confidence_percent"], 85.0);

    handle.abort();
}

#[tokio::test]
async fn test_analyze_tie_is_credible() {
    let (port, handle) = start(Arc::new(KeywordClassifier)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://127.0.0.1:{}/analyze", port))
        .json(&json!({ "text": "a hoax here nothing to see" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["verdict"], "CREDIBLE");
    assert_eq!(body["explanation"], "mixed_signals");

    handle.abort();
}

#[tokio::test]
async fn test_analyze_empty_text_is_bad_request() {
    let (port, handle) = start(Arc::new(KeywordClassifier)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://127.0.0.1:{}/analyze", port))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "empty_input");

    handle.abort();
}

#[tokio::test]
async fn test_analyze_malformed_body_is_bad_request() {
    let (port, handle) = start(Arc::new(KeywordClassifier)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://127.0.0.1:{}/analyze", port))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    handle.abort();
}

#[tokio::test]
async fn test_classifier_failure_is_bad_gateway() {
    let (port, handle) = start(Arc::new(BrokenClassifier)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://127.0.0.1:{}/analyze", port))
        .json(&json!({ "text": "anything at all" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "classifier_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("model unavailable"));

    handle.abort();
}
