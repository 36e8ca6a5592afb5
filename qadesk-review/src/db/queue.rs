//! Work queue operations
//!
//! Claiming, skip routing, and the bulk maintenance commands. The claim is a
//! single UPDATE statement, so SQLite's write serialization guarantees that a
//! record is handed to at most one operator. Multi-step routing runs inside a
//! transaction.

use qadesk_common::db::{Queue, QueueRecord, RecordId};
use qadesk_common::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

pub(crate) const COLUMNS: &str = "id, label, number, description, image_url, image_count, \
     batch_code, contributor, contributed_at, jump_url, record_status, lock, skipped";

/// `record_status = false`, `lock != true`, `skipped != true`
///
/// A NULL `record_status` does not match; NULL `lock`/`skipped` do. Mirrors
/// [`QueueRecord::is_claimable`].
const CLAIMABLE: &str =
    "record_status = 0 AND COALESCE(lock, 0) = 0 AND COALESCE(skipped, 0) = 0";

/// Result of routing a skipped record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// Primary-queue record moved into the problem queue
    MovedToProblem,
    /// Problem-queue record flagged `skipped` in place
    MarkedSkipped,
    /// No record with that identity in the named queue
    NotFound,
}

/// Atomically claim the lowest-id claimable record of a queue
///
/// Returns `None` when nothing is claimable right now. There is no retry: a
/// caller that loses a race simply gets the next record or nothing.
pub async fn claim_next(pool: &SqlitePool, queue: Queue) -> Result<Option<QueueRecord>> {
    let table = queue.table();
    let sql = format!(
        "UPDATE {table} SET lock = 1
         WHERE id = (SELECT id FROM {table} WHERE {CLAIMABLE} ORDER BY id LIMIT 1)
           AND {CLAIMABLE}
         RETURNING {COLUMNS}"
    );

    let claimed = sqlx::query_as::<_, QueueRecord>(&sql)
        .fetch_optional(pool)
        .await?;

    if claimed.is_none() {
        debug!(queue = %queue, "No claimable record");
    }
    Ok(claimed)
}

/// Look up one record by identity
pub async fn find_record(
    pool: &SqlitePool,
    queue: Queue,
    id: &RecordId,
) -> Result<Option<QueueRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = ?", queue.table());
    let record = sqlx::query_as::<_, QueueRecord>(&sql)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Insert a record, replacing any row with the same identity
pub async fn insert_record(pool: &SqlitePool, queue: Queue, record: &QueueRecord) -> Result<()> {
    let mut conn = pool.acquire().await?;
    insert_record_on(&mut conn, queue, record).await
}

pub(crate) async fn insert_record_on(
    conn: &mut SqliteConnection,
    queue: Queue,
    record: &QueueRecord,
) -> Result<()> {
    sqlx::query(&format!(
        "INSERT OR REPLACE INTO {} ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        queue.table()
    ))
    .bind(&record.id)
    .bind(&record.label)
    .bind(&record.number)
    .bind(&record.description)
    .bind(&record.image_url)
    .bind(record.image_count)
    .bind(&record.batch_code)
    .bind(&record.contributor)
    .bind(&record.contributed_at)
    .bind(&record.jump_url)
    .bind(record.record_status)
    .bind(record.lock)
    .bind(record.skipped)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete a record and return it, optionally only when `predicate` holds
///
/// Checking and removing in one statement means a concurrent change to the
/// record either happens entirely before or entirely after this call.
pub(crate) async fn take_record_on(
    conn: &mut SqliteConnection,
    queue: Queue,
    id: &RecordId,
    predicate: Option<&'static str>,
) -> Result<Option<QueueRecord>> {
    let extra = predicate
        .map(|p| format!(" AND {p}"))
        .unwrap_or_default();
    let sql = format!(
        "DELETE FROM {} WHERE id = ?{extra} RETURNING {COLUMNS}",
        queue.table()
    );

    let record = sqlx::query_as::<_, QueueRecord>(&sql)
        .bind(id.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(record)
}

/// Number of records flagged `skipped` in a queue
pub async fn count_skipped(pool: &SqlitePool, queue: Queue) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE skipped = 1",
        queue.table()
    ))
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Route a skipped record according to the queue it lives in
///
/// - primary queue: move the record (same identity and fields, lock released)
///   into the problem queue
/// - problem queue: set `lock = false, skipped = true` in place
pub async fn skip_record(pool: &SqlitePool, queue: Queue, id: &RecordId) -> Result<SkipOutcome> {
    let mut tx = pool.begin().await?;

    let outcome = match queue {
        Queue::Qa => match take_record_on(&mut *tx, Queue::Qa, id, None).await? {
            Some(record) => {
                let moved = QueueRecord {
                    lock: Some(false),
                    ..record
                };
                insert_record_on(&mut *tx, Queue::Problem, &moved).await?;
                SkipOutcome::MovedToProblem
            }
            None => SkipOutcome::NotFound,
        },
        Queue::Problem => {
            let updated = sqlx::query(
                "UPDATE problem_queue SET lock = 0, skipped = 1 WHERE id = ?",
            )
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                SkipOutcome::NotFound
            } else {
                SkipOutcome::MarkedSkipped
            }
        }
    };

    tx.commit().await?;
    Ok(outcome)
}

/// Flag every record whose number is listed as skipped and unclaimed
///
/// Sets `record_status = false, skipped = true, lock = false`. Returns the
/// number of records updated.
pub async fn bulk_skip(pool: &SqlitePool, queue: Queue, numbers: &[String]) -> Result<u64> {
    if numbers.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "UPDATE {} SET record_status = 0, skipped = 1, lock = 0 WHERE number IN (",
        queue.table()
    ));
    let mut separated = builder.separated(", ");
    for number in numbers {
        separated.push_bind(number);
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Release the claim on every unfinalized record of a queue
pub async fn release_locks(pool: &SqlitePool, queue: Queue) -> Result<u64> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET lock = 0 WHERE lock = 1 AND COALESCE(record_status, 0) = 0",
        queue.table()
    ))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
