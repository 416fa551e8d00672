//! HTTP API exposing the workflows as JSON endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{error, info};

use crate::api::BlogPlanner;
use crate::core::config::MAX_NUM_TOPICS;

#[derive(Clone)]
struct AppState {
    planner: BlogPlanner,
}

#[derive(Debug, Deserialize)]
struct TopicsRequest {
    theme: Option<String>,
    num_topics: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OutlineRequest {
    selected_topic: Option<String>,
    target_audience: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An error response: `{ "error": message }` with the given status.
struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, msg.into())
    }

    fn internal(msg: impl Into<String>) -> Self {
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Builds the router: `POST /api/topics`, `POST /api/outline`, `GET /health`.
pub fn router(planner: BlogPlanner) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/topics", post(generate_topics))
        .route("/api/outline", post(generate_outline))
        .with_state(AppState { planner })
}

/// Serves the API until the process is stopped.
pub async fn serve(planner: BlogPlanner, listen: SocketAddr) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", listen, e))?;
    info!(%listen, "blog-planner API listening");
    axum::serve(listener, router(planner))
        .await
        .map_err(|e| format!("Server terminated with error: {}", e))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

async fn generate_topics(
    State(state): State<AppState>,
    payload: Result<Json<TopicsRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = payload?;
    let theme = required(req.theme).ok_or_else(|| ApiError::bad_request("Theme is required"))?;
    let count = match req.num_topics {
        None => state.planner.config().default_num_topics,
        Some(n) if (1..=MAX_NUM_TOPICS as i64).contains(&n) => n as usize,
        Some(n) => {
            return Err(ApiError::bad_request(format!(
                "num_topics must be between 1 and {}, got {}",
                MAX_NUM_TOPICS, n
            )))
        }
    };

    let planner = state.planner.clone();
    let outcome = tokio::spawn(async move { planner.run_topic_ideation(&theme, count).await })
        .await
        .map_err(|e| {
            error!(error = %e, "topic workflow task failed");
            ApiError::internal(format!("Error generating topics: {}", e))
        })?;

    if let Some(err) = outcome.error {
        return Err(ApiError::internal(err));
    }
    Ok(Json(json!({ "generated_topics": outcome.topics })))
}

async fn generate_outline(
    State(state): State<AppState>,
    payload: Result<Json<OutlineRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = payload?;
    let (Some(topic), Some(audience)) = (required(req.selected_topic), required(req.target_audience))
    else {
        return Err(ApiError::bad_request(
            "Selected topic and target audience are required",
        ));
    };

    let planner = state.planner.clone();
    let outcome = tokio::spawn(async move {
        planner
            .run_outline_generation(&topic, Some(audience.as_str()))
            .await
    })
    .await
    .map_err(|e| {
        error!(error = %e, "outline workflow task failed");
        ApiError::internal(format!("Error generating outline: {}", e))
    })?;

    if let Some(err) = outcome.error {
        return Err(ApiError::internal(err));
    }
    let outline = outcome
        .outline
        .ok_or_else(|| ApiError::internal("Failed to generate outline"))?;
    Ok(Json(json!({ "generated_outline": outline })))
}
