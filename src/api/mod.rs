// HTTP API routes (action scoring, opening narrative, probes).

use axum::{
    extract::{rejection::JsonRejection, Json, MatchedPath, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::conversation::ConversationContext;
use crate::error::ApiError;
use crate::evaluator::ActionEvaluator;
use crate::metrics;
use crate::narrative::OpeningNarrator;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitActionRequest {
    pub username: Option<String>,
    pub action: Option<String>,
    pub previouscontext: Option<ConversationContext>,
}

#[derive(Debug, Deserialize)]
pub struct FirstMessageRequest {
    pub username: Option<String>,
}

// ── Response types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubmitActionResponse {
    pub score: i64,
    pub story: String,
    pub username: String,
    pub action: String,
    pub previouscontext: ConversationContext,
}

#[derive(Debug, Serialize)]
pub struct FirstMessageResponse {
    pub story: String,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<ActionEvaluator>,
    pub narrator: Arc<OpeningNarrator>,
}

impl AppState {
    pub fn new(evaluator: ActionEvaluator, narrator: OpeningNarrator) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            narrator: Arc::new(narrator),
        }
    }
}

// ── Extraction helpers ────────────────────────────────────────────────

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            Err(ApiError::BadRequest("No JSON data provided".to_string()))
        }
        Err(rejection) => Err(ApiError::BadRequest(format!(
            "Invalid JSON data: {}",
            rejection.body_text()
        ))),
    }
}

/// `Some` only for a present, non-empty value.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/llms.txt", get(get_llms_txt))
        .route("/api/test", get(api_test))
        .route("/api/submit-action", post(submit_action))
        .route("/first-message", post(first_message))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Full application: API routes, CORS, and the optional front-end bundle.
pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut app = router(state);
    if let Some(dir) = static_dir {
        tracing::info!("Serving front-end from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(CorsLayer::permissive())
}

async fn track_requests(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(req).await;
    metrics::API_REQUESTS_TOTAL
        .with_label_values(&[endpoint.as_str(), response.status().as_str()])
        .inc();
    response
}

// ── Probe handlers ────────────────────────────────────────────────────

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "planet-saver-backend" }))
}

async fn api_test() -> Json<Value> {
    Json(json!({ "message": "qwerty" }))
}

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
}

async fn get_llms_txt() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::llms_txt::LLMS_TXT,
    )
}

// ── Game handlers ─────────────────────────────────────────────────────

async fn submit_action(
    State(state): State<AppState>,
    payload: Result<Json<SubmitActionRequest>, JsonRejection>,
) -> Result<Json<SubmitActionResponse>, ApiError> {
    let req = json_body(payload)?;
    let (Some(username), Some(action)) = (required(req.username), required(req.action)) else {
        return Err(ApiError::BadRequest("Missing username or action".to_string()));
    };

    let outcome = state
        .evaluator
        .evaluate(&username, &action, req.previouscontext.unwrap_or_default())
        .await?;

    Ok(Json(SubmitActionResponse {
        score: outcome.evaluation.score,
        story: outcome.evaluation.story,
        username,
        action,
        previouscontext: outcome.context,
    }))
}

async fn first_message(
    State(state): State<AppState>,
    payload: Result<Json<FirstMessageRequest>, JsonRejection>,
) -> Result<Json<FirstMessageResponse>, ApiError> {
    let req = json_body(payload)?;
    let Some(username) = required(req.username) else {
        return Err(ApiError::BadRequest("Missing username".to_string()));
    };

    let story = state.narrator.open(&username).await?;
    Ok(Json(FirstMessageResponse { story }))
}
