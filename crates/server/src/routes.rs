//! HTTP surface of the dashboard backend.

use crate::health_checks::{HealthCheckSystem, HealthReport};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use domain::{compute_analytics, Dataset, SalesAnalytics};
use llm::{AiRelay, RelayOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const AI_UNAVAILABLE_ANSWER: &str =
    "AI features are currently unavailable. Please check your API key configuration.";
pub const EMPTY_QUESTION_ANSWER: &str = "Please ask a specific question about the sales data.";
pub const AI_ERROR_ANSWER: &str =
    "I'm sorry, I encountered an error processing your question. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub relay: Arc<AiRelay>,
    pub health: Arc<HealthCheckSystem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AiRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiResponse {
    pub answer: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/data", get(get_data))
        .route("/api/sales-analytics", get(get_sales_analytics))
        .route("/api/ai", post(ask_ai))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fixed user-facing text for every relay outcome
pub fn answer_text(outcome: RelayOutcome) -> String {
    match outcome {
        RelayOutcome::Answered(answer) => answer,
        RelayOutcome::Disabled => AI_UNAVAILABLE_ANSWER.to_string(),
        RelayOutcome::EmptyQuestion => EMPTY_QUESTION_ANSWER.to_string(),
        RelayOutcome::Failed(_) => AI_ERROR_ANSWER.to_string(),
    }
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Sales Dashboard API is running".to_string(),
    })
}

async fn get_data(State(state): State<AppState>) -> Json<Dataset> {
    Json(state.dataset.as_ref().clone())
}

async fn get_sales_analytics(State(state): State<AppState>) -> Json<SalesAnalytics> {
    Json(compute_analytics(&state.dataset))
}

async fn ask_ai(State(state): State<AppState>, Json(request): Json<AiRequest>) -> Json<AiResponse> {
    let outcome = state.relay.answer(&request.question).await;
    Json(AiResponse {
        answer: answer_text(outcome),
    })
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.report().await;
    let code = StatusCode::from_u16(report.http_status_code())
        .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
    (code, Json(report))
}
