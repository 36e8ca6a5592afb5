//! Timestamp utilities

use chrono::Local;

/// Format used for reviewer timestamps stored on archive records
pub const REVIEW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered in [`REVIEW_TIME_FORMAT`]
pub fn review_timestamp() -> String {
    Local::now().format(REVIEW_TIME_FORMAT).to_string()
}
