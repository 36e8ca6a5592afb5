//! Archive operations: write reviewed records, search, edit

use qadesk_common::db::{ArchiveRecord, Queue, RecordId, ARCHIVE_TABLE};
use qadesk_common::Result;
use sqlx::{SqliteConnection, SqlitePool};

use super::queue::take_record_on;
use crate::transform::{to_archive, ReviewInput};

const COLUMNS: &str = "id, label, number, title, note, description, product_image, \
     image_count, batch_code, contributor, contributed_at, reviewer, reviewed_at, \
     record_status, jump_url";

/// Still claimed and not yet finalized; mirrors
/// [`qadesk_common::db::QueueRecord::is_submittable`]
const SUBMITTABLE: &str = "lock = 1 AND record_status = 0";

/// Numeric numbers sort numerically, then text order breaks ties
const BY_NUMBER: &str = "CAST(number AS INTEGER) ASC, number ASC, id ASC";

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Record archived and removed from its queue
    Archived(ArchiveRecord),
    /// Record missing, unclaimed, or already finalized; nothing changed
    Stale,
}

/// Archive a claimed record and remove it from its queue
///
/// The claim is re-checked in the same statement that removes the queue
/// row, and the archive insert commits together with that removal.
pub async fn archive_claimed(
    pool: &SqlitePool,
    queue: Queue,
    id: &RecordId,
    input: &ReviewInput<'_>,
) -> Result<SubmitOutcome> {
    let mut tx = pool.begin().await?;

    let Some(record) = take_record_on(&mut *tx, queue, id, Some(SUBMITTABLE)).await? else {
        return Ok(SubmitOutcome::Stale);
    };

    let archived = to_archive(&record, input);
    insert_archive_on(&mut *tx, &archived).await?;

    tx.commit().await?;
    Ok(SubmitOutcome::Archived(archived))
}

async fn insert_archive_on(conn: &mut SqliteConnection, record: &ArchiveRecord) -> Result<()> {
    sqlx::query(&format!(
        "INSERT OR REPLACE INTO {ARCHIVE_TABLE} ({COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&record.id)
    .bind(&record.label)
    .bind(&record.number)
    .bind(&record.title)
    .bind(&record.note)
    .bind(&record.description)
    .bind(&record.product_image)
    .bind(record.image_count)
    .bind(&record.batch_code)
    .bind(&record.contributor)
    .bind(&record.contributed_at)
    .bind(&record.reviewer)
    .bind(&record.reviewed_at)
    .bind(record.record_status)
    .bind(&record.jump_url)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// List archive records sorted by number
///
/// The query is trimmed first. An empty query lists everything; otherwise
/// only records whose title or number contains the query, ignoring case
/// (Unicode case folding, not just ASCII).
pub async fn search_archive(pool: &SqlitePool, query: &str) -> Result<Vec<ArchiveRecord>> {
    let records = sqlx::query_as::<_, ArchiveRecord>(&format!(
        "SELECT {COLUMNS} FROM {ARCHIVE_TABLE} ORDER BY {BY_NUMBER}"
    ))
    .fetch_all(pool)
    .await?;

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(records);
    }

    // SQLite's lower() folds ASCII only
    Ok(records
        .into_iter()
        .filter(|r| matches_query(r, &needle))
        .collect())
}

fn matches_query(record: &ArchiveRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle) || record.number.to_lowercase().contains(needle)
}

/// Fetch one archive record
pub async fn get_archive(pool: &SqlitePool, id: &RecordId) -> Result<Option<ArchiveRecord>> {
    let record = sqlx::query_as::<_, ArchiveRecord>(&format!(
        "SELECT {COLUMNS} FROM {ARCHIVE_TABLE} WHERE id = ?"
    ))
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Overwrite title and description of one archive record
///
/// Returns false when no record has that identity.
pub async fn update_archive(
    pool: &SqlitePool,
    id: &RecordId,
    title: &str,
    description: &str,
) -> Result<bool> {
    let updated = sqlx::query(&format!(
        "UPDATE {ARCHIVE_TABLE} SET title = ?, description = ? WHERE id = ?"
    ))
    .bind(title)
    .bind(description)
    .bind(id.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    Ok(updated > 0)
}
