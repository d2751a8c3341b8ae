//! HTTP analysis API.
//!
//! A request/response front end for the analyzer, so articles can be
//! checked from other tools without a terminal.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/analyze` | Analyze `{"text": "...", "title": "..."}` |
//! | `GET`  | `/health` | Health check (returns version and classifier) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "empty_input", "message": "Article text is empty: nothing to classify" } }
//! ```
//!
//! Error codes: `empty_input` (400), `invalid_configuration` (400),
//! `bad_request` (400), `classifier_error` (502).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::analyze::Analyzer;
use crate::classifier::{create_classifier, Classifier};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AnalysisResult, Article};

/// Shared state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    analyzer: Arc<Analyzer>,
}

/// Starts the HTTP server with the classifier named in `config`.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let classifier = create_classifier(&config.classifier)?;
    run_server_with_classifier(config, classifier).await
}

/// Starts the HTTP server with an explicit classifier.
///
/// Used by embedders and tests that supply their own [`Classifier`].
pub async fn run_server_with_classifier(
    config: &Config,
    classifier: Arc<dyn Classifier>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let analyzer = Arc::new(Analyzer::from_config(config, classifier));

    tracing::info!(
        classifier = analyzer.classifier().name(),
        model = analyzer.classifier().model_name(),
        "classifier ready"
    );

    let app = router(analyzer);

    println!("Analysis server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router around a shared analyzer.
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { analyzer })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let status = match err {
            AnalysisError::EmptyInput | AnalysisError::InvalidConfiguration { .. } => {
                StatusCode::BAD_REQUEST
            }
            AnalysisError::Classifier { .. } => StatusCode::BAD_GATEWAY,
        };
        AppError {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request".to_string(),
            message: rejection.body_text(),
        }
    }
}

// ============ Handlers ============

async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<Article>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(article) = payload?;
    match state.analyzer.analyze_article(&article).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            tracing::warn!(error = %err, "analysis failed");
            Err(err.into())
        }
    }
}

async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": state.analyzer.classifier().name(),
    }))
}
