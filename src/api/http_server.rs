use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::classify::{classify_upload_html, classify_upload_json, classify_url};
use super::pages::landing_page;
use crate::acquire::{self, DEFAULT_MAX_FETCH_BYTES};
use crate::classifier::ImageClassifier;
use crate::config::ServiceConfig;

/// Shared per-process state.
///
/// The classifier (and its label list) is built once at startup and
/// never mutated; per-request state never lands here.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ImageClassifier>,
    pub http_client: reqwest::Client,
    pub max_fetch_bytes: usize,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        http_client: reqwest::Client,
        max_fetch_bytes: usize,
    ) -> Self {
        Self {
            classifier,
            http_client,
            max_fetch_bytes,
        }
    }

    /// State backed by a canned boar/deer/other classifier, for tests.
    pub fn new_for_test() -> Self {
        use crate::classifier::FixedClassifier;

        let classifier = FixedClassifier::new(
            vec!["boar".to_string(), "deer".to_string(), "other".to_string()],
            vec![0.1, 0.7, 0.2],
        );
        Self {
            classifier: Arc::new(classifier),
            http_client: acquire::build_http_client(5),
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
        }
    }
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Landing form
        .route("/", get(index_handler))
        // Health check
        .route("/health", get(health_handler))
        // Classification endpoints
        .route("/classify-upload", post(classify_upload_json))
        .route("/upload", post(classify_upload_html))
        .route("/classify-url", get(classify_url))
        // Uploads share the decoder's size cap
        .layer(DefaultBodyLimit::max(crate::vision::decode::MAX_IMAGE_SIZE))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    config: &ServiceConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_addr, config.port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("classification server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> Html<String> {
    Html(landing_page())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::response::Json(json!({
        "status": "healthy",
        "model": state.classifier.model_name(),
        "labels": state.classifier.labels().len(),
    }))
}
