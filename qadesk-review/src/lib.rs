//! qadesk-review library - record review service
//!
//! Operators claim pending records one at a time from the QA queue or the
//! problem queue, finalize them into the archive, or skip them. Finalized
//! records can be searched and edited afterwards.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod transform;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Key for signing session cookies
    pub session_secret: Arc<str>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, session_secret: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            session_secret: session_secret.into(),
        }
    }
}

/// Build application router
///
/// Everything except login, logout and health requires a session.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a session)
    let protected = Router::new()
        .route("/", get(api::review_page))
        .route("/submit", post(api::submit_record))
        .route("/skip", post(api::skip_record))
        .route("/records", get(api::records_page))
        .route("/edit/:id", get(api::edit_page).post(api::update_record))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_gate,
        ));

    // Public routes
    let public = Router::new()
        .route("/login", get(api::login_page).post(api::login))
        .route("/logout", get(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
