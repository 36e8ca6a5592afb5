//! Review workflow handlers: claim, submit, skip
//!
//! Submit and skip never report failures caused by stale input. A missing or
//! malformed record id, or a record whose claim was lost, sends the operator
//! back to the queue unchanged.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Extension, Form,
};
use qadesk_common::db::{Queue, RecordId};
use qadesk_common::time::review_timestamp;
use serde::Deserialize;
use tracing::{debug, info};

use super::pages;
use super::session::Operator;
use crate::db::{self, SkipOutcome, SubmitOutcome};
use crate::error::ApiResult;
use crate::transform::ReviewInput;
use crate::AppState;

/// Query parameters for the review page
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub source: Option<String>,
}

/// Submit form fields
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Skip form fields
#[derive(Debug, Deserialize)]
pub struct SkipForm {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub source: String,
}

fn back_to_queue(queue: Queue) -> Redirect {
    Redirect::to(&format!("/?source={}", queue))
}

/// GET /?source=qa|problem
///
/// Claims the next record of the selected queue and renders it.
pub async fn review_page(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Query(query): Query<QueueQuery>,
) -> ApiResult<Html<String>> {
    let queue = Queue::from_param(query.source.as_deref());

    let skipped = db::count_skipped(&state.db, queue).await?;
    let record = db::claim_next(&state.db, queue).await?;

    if let Some(ref record) = record {
        info!(
            record_id = %record.id,
            queue = %queue,
            operator = %operator.name,
            "Claimed record"
        );
    }

    Ok(Html(pages::review_page(
        &operator,
        queue,
        record.as_ref(),
        skipped,
    )))
}

/// POST /submit
pub async fn submit_record(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Form(form): Form<SubmitForm>,
) -> ApiResult<Redirect> {
    let queue = Queue::from_param(Some(&form.source));

    let Some(id) = RecordId::parse(&form.doc_id) else {
        debug!(doc_id = %form.doc_id, "Ignoring submit with invalid record id");
        return Ok(back_to_queue(queue));
    };

    let reviewed_at = review_timestamp();
    let input = ReviewInput {
        title: &form.title,
        description: &form.description,
        reviewer: &operator.name,
        reviewed_at: &reviewed_at,
    };

    match db::archive_claimed(&state.db, queue, &id, &input).await? {
        SubmitOutcome::Archived(record) => info!(
            record_id = %id,
            queue = %queue,
            operator = %operator.name,
            title = %record.title,
            "Archived record"
        ),
        SubmitOutcome::Stale => info!(
            record_id = %id,
            queue = %queue,
            operator = %operator.name,
            "Dropped submission for record no longer claimed"
        ),
    }

    Ok(back_to_queue(queue))
}

/// POST /skip
pub async fn skip_record(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Form(form): Form<SkipForm>,
) -> ApiResult<Redirect> {
    let queue = Queue::from_param(Some(&form.source));

    let Some(id) = RecordId::parse(&form.doc_id) else {
        debug!(doc_id = %form.doc_id, "Ignoring skip with invalid record id");
        return Ok(back_to_queue(queue));
    };

    let outcome = db::skip_record(&state.db, queue, &id).await?;
    match outcome {
        SkipOutcome::NotFound => debug!(record_id = %id, queue = %queue, "Skip target not found"),
        _ => info!(
            record_id = %id,
            queue = %queue,
            operator = %operator.name,
            outcome = ?outcome,
            "Skipped record"
        ),
    }

    Ok(back_to_queue(queue))
}
