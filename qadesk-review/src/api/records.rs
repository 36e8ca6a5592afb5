//! Archive browser and editor

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Extension, Form,
};
use qadesk_common::db::RecordId;
use serde::Deserialize;
use tracing::info;

use super::pages;
use super::session::Operator;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for the archive search
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    #[serde(default)]
    pub q: String,
}

/// Edit form fields
#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

fn parse_id(raw: &str) -> ApiResult<RecordId> {
    RecordId::parse(raw).ok_or_else(|| ApiError::NotFound(format!("record {}", raw)))
}

/// GET /records?q=
pub async fn records_page(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Query(query): Query<RecordsQuery>,
) -> ApiResult<Html<String>> {
    let records = db::search_archive(&state.db, &query.q).await?;
    Ok(Html(pages::records_page(&operator, &query.q, &records)))
}

/// GET /edit/:id
pub async fn edit_page(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(raw_id): Path<String>,
) -> ApiResult<Html<String>> {
    let id = parse_id(&raw_id)?;
    let record = db::get_archive(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("record {}", id)))?;
    Ok(Html(pages::edit_page(&operator, &record)))
}

/// POST /edit/:id
pub async fn update_record(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(raw_id): Path<String>,
    Form(form): Form<EditForm>,
) -> ApiResult<Redirect> {
    let id = parse_id(&raw_id)?;

    if !db::update_archive(&state.db, &id, &form.title, &form.description).await? {
        return Err(ApiError::NotFound(format!("record {}", id)));
    }

    info!(record_id = %id, operator = %operator.name, "Edited archive record");
    Ok(Redirect::to("/records"))
}
