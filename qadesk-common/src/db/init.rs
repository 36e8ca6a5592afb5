//! Database initialization
//!
//! Opens (creating if needed) the SQLite store and creates the queue and
//! archive tables. Safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::models::Queue;

/// Archive table name
pub const ARCHIVE_TABLE: &str = "check_done";

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Connect to the store and create tables if needed
///
/// `database_url` is a sqlx SQLite URL such as `sqlite://qadesk.db` or
/// `sqlite::memory:`. The file is created when missing.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    info!("Database ready");
    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_queue_table(pool, Queue::Qa).await?;
    create_queue_table(pool, Queue::Problem).await?;
    create_archive_table(pool).await?;
    Ok(())
}

async fn create_queue_table(pool: &SqlitePool, queue: Queue) -> Result<()> {
    let table = queue.table();
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            label TEXT,
            number TEXT,
            description TEXT,
            image_url TEXT,
            image_count INTEGER,
            batch_code TEXT,
            contributor TEXT,
            contributed_at TEXT,
            jump_url TEXT,
            record_status INTEGER,
            lock INTEGER,
            skipped INTEGER
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_number ON {table}(number)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_archive_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {ARCHIVE_TABLE} (
            id TEXT PRIMARY KEY,
            label TEXT NOT NULL DEFAULT '',
            number TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            note TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            product_image TEXT NOT NULL DEFAULT '',
            image_count INTEGER NOT NULL DEFAULT 0,
            batch_code TEXT NOT NULL DEFAULT '',
            contributor TEXT NOT NULL DEFAULT '',
            contributed_at TEXT NOT NULL DEFAULT '',
            reviewer TEXT NOT NULL DEFAULT '',
            reviewed_at TEXT NOT NULL DEFAULT '',
            record_status INTEGER NOT NULL DEFAULT 1,
            jump_url TEXT NOT NULL DEFAULT ''
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}
