//! Liveness and database reachability

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store does not answer
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// `ok` or the store error
    pub database: String,
}

/// GET /health
///
/// No session required. Answers 503 when the store cannot run a trivial query.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, database) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => ("ok", StatusCode::OK, "ok".to_string()),
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            module: "qadesk-review",
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
