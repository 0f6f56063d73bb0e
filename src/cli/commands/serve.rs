//! HTTP API server.
//!
//! Exposes the chapter pipeline as a single JSON endpoint.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::ChapterizeError;
use crate::orchestrator::{ChapterResponse, Orchestrator, VideoRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

/// Run the HTTP API server.
///
/// Host and port override the `[server]` section of the settings.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;

    let state = Arc::new(AppState { orchestrator });
    let app = router(state, settings.server.cors);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Chapterize API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate Chapters", "POST /generate_chapters");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router.
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/generate_chapters", post(generate_chapters))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

// === Errors ===

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Maps pipeline errors and rejected request bodies onto HTTP responses.
pub enum ApiError {
    Pipeline(ChapterizeError),
    Body(JsonRejection),
}

impl From<ChapterizeError> for ApiError {
    fn from(err: ChapterizeError) -> Self {
        Self::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Pipeline(ChapterizeError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Pipeline(ChapterizeError::TranscriptFetch(_)) => StatusCode::NOT_FOUND,
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Body(rejection) => rejection.body_text(),
            Self::Pipeline(
                err @ (ChapterizeError::InvalidInput(_)
                | ChapterizeError::TranscriptFetch(_)
                | ChapterizeError::ChapterGeneration(_)
                | ChapterizeError::ChapterRefinement(_)),
            ) => err.to_string(),
            Self::Pipeline(other) => format!("An unexpected error occurred: {}", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("{}", detail);
        }
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "YouTube Chapter Generator API is running. Use /generate_chapters endpoint to generate chapters."
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_chapters(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let Json(req) = payload?;
    let request_id = Uuid::new_v4();
    let span = info_span!("generate_chapters", %request_id);

    let response = state
        .orchestrator
        .generate_chapters(&req)
        .instrument(span)
        .await?;

    Ok(Json(response))
}
