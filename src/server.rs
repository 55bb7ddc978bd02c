//! Axum HTTP server: the history service.
//!
//! The store is shared as `Arc<HistoryStore>` across async handlers. Every
//! path without a route falls through to the static asset directory.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/history`, `/api/history` | Up to 100 records, newest first |
//! | POST | `/history`, `/api/history` | Record a finished game |

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::constants::DEFAULT_RESULT;
use crate::error::Error;
use crate::history::HistoryStore;
use crate::types::{HistoryRecord, NewHistoryRecord};

pub type AppState = Arc<HistoryStore>;

/// API routes only.
pub fn create_router(store: Arc<HistoryStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route(
            "/history",
            get(handle_get_history).post(handle_post_history),
        )
        .route(
            "/api/history",
            get(handle_get_history).post(handle_post_history),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// API routes plus static files from `static_dir` for everything else.
pub fn create_router_with_static(store: Arc<HistoryStore>, static_dir: &Path) -> Router {
    create_router(store).fallback_service(ServeDir::new(static_dir))
}

// ── Request/Response types ──────────────────────────────────────────

/// Fields of a history write, read leniently from the request body.
///
/// A missing or malformed body reads as an empty request, so it fails the
/// username check like any other request without one.
#[derive(Debug, Default)]
struct HistoryRequest {
    username: Option<String>,
    score: Option<i64>,
    result: Option<String>,
}

impl HistoryRequest {
    fn from_body(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            username: text("username"),
            score: value.get("score").and_then(parse_score),
            result: text("result"),
        }
    }

    fn into_record(self) -> Result<NewHistoryRecord, Error> {
        let username = self
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingUsername)?;
        let result = self
            .result
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESULT.to_string());
        Ok(NewHistoryRecord {
            username,
            score: self.score.unwrap_or(0),
            result,
        })
    }
}

/// Integers, floats (truncated) and numeric strings; anything else is no score.
fn parse_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn store_error(e: Error) -> ApiError {
    if e.is_validation() {
        return error_response(StatusCode::BAD_REQUEST, &e.to_string());
    }
    error!(error = %e, "history store failure");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_history(
    State(store): State<AppState>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let records = store.recent().map_err(store_error)?;
    Ok(Json(records))
}

// ── POST handler ────────────────────────────────────────────────────

async fn handle_post_history(
    State(store): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let record = HistoryRequest::from_body(&body)
        .into_record()
        .map_err(store_error)?;
    let id = store.insert(&record).map_err(store_error)?;
    info!(id, username = %record.username, score = record.score, "history recorded");
    Ok(Json(serde_json::json!({ "id": id })))
}
