//! Store operations for the review service
//!
//! Free functions over the shared `SqlitePool`; schema lives in
//! `qadesk_common::db`.

pub mod archive;
pub mod queue;

pub use archive::{archive_claimed, get_archive, search_archive, update_archive, SubmitOutcome};
pub use queue::{
    bulk_skip, claim_next, count_skipped, find_record, insert_record, release_locks, skip_record,
    SkipOutcome,
};
