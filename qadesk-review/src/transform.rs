//! Record transformation
//!
//! Maps a claimed queue record plus the reviewer's input into the archive
//! shape. Pure: the caller supplies the review timestamp.

use qadesk_common::db::{ArchiveRecord, QueueRecord};

/// Reviewer input collected from the submit form
#[derive(Debug, Clone)]
pub struct ReviewInput<'a> {
    /// Leading part of the archive title
    pub title: &'a str,
    pub description: &'a str,
    pub reviewer: &'a str,
    pub reviewed_at: &'a str,
}

/// Compose `"{fragment} {label} {number}"`, trimmed at both ends only
pub fn compose_title(fragment: &str, label: &str, number: &str) -> String {
    format!("{} {} {}", fragment, label, number).trim().to_string()
}

/// Build the archive record for a reviewed queue record
///
/// Missing source strings become `""` and a missing image count becomes `0`.
pub fn to_archive(record: &QueueRecord, input: &ReviewInput<'_>) -> ArchiveRecord {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();

    let label = text(&record.label);
    let number = text(&record.number);
    let title = compose_title(input.title, &label, &number);

    ArchiveRecord {
        id: record.id.clone(),
        label,
        number,
        title,
        note: text(&record.description),
        description: input.description.to_string(),
        product_image: text(&record.image_url),
        image_count: record.image_count.unwrap_or(0),
        batch_code: text(&record.batch_code),
        contributor: text(&record.contributor),
        contributed_at: text(&record.contributed_at),
        reviewer: input.reviewer.to_string(),
        reviewed_at: input.reviewed_at.to_string(),
        record_status: true,
        jump_url: text(&record.jump_url),
    }
}
