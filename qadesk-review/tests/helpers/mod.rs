//! Shared setup for qadesk-review integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use qadesk_common::db::{init_database, Queue, QueueRecord};
use qadesk_common::session::{issue_token, SESSION_COOKIE};
use qadesk_review::{build_router, db, AppState};
use sqlx::SqlitePool;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh in-memory database with the full schema
pub async fn test_pool() -> SqlitePool {
    init_database("sqlite::memory:").await.unwrap()
}

/// Queue record with the fields the review page shows
pub fn sample_record(id: &str, number: &str) -> QueueRecord {
    QueueRecord {
        label: Some("CM".to_string()),
        number: Some(number.to_string()),
        description: Some(format!("note for {}", number)),
        image_url: Some(format!("https://img.example/{}.jpg", number)),
        image_count: Some(2),
        batch_code: Some("B-7".to_string()),
        contributor: Some("carol".to_string()),
        contributed_at: Some("2024-02-28 09:00:00".to_string()),
        jump_url: Some(format!("https://shop.example/item/{}", number)),
        ..QueueRecord::pending(id)
    }
}

pub async fn seed(pool: &SqlitePool, queue: Queue, records: &[QueueRecord]) {
    for record in records {
        db::insert_record(pool, queue, record).await.unwrap();
    }
}

pub fn app(pool: SqlitePool) -> Router {
    build_router(AppState::new(pool, TEST_SECRET))
}

/// Cookie header value for a logged-in operator
pub fn session_cookie(operator: &str) -> String {
    format!("{}={}", SESSION_COOKIE, issue_token(operator, TEST_SECRET))
}

pub fn get(uri: &str, operator: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(op) = operator {
        builder = builder.header(header::COOKIE, session_cookie(op));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, operator: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(op) = operator {
        builder = builder.header(header::COOKIE, session_cookie(op));
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry Location")
        .to_str()
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
