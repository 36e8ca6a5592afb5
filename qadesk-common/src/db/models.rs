//! Database models
//!
//! One explicit type per table. Queue rows arrive from an external loader, so
//! every column except the identity is optional; archive rows are written only
//! by the review service and carry concrete values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two work queues a record can be served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Queue {
    /// Primary work queue
    Qa,
    /// Secondary queue for records skipped out of the primary queue
    Problem,
}

impl Queue {
    /// Map the `source` request parameter to a queue
    ///
    /// `problem` selects the secondary queue; anything else, including a
    /// missing parameter, selects the primary queue.
    pub fn from_param(source: Option<&str>) -> Self {
        match source.map(str::trim) {
            Some("problem") => Queue::Problem,
            _ => Queue::Qa,
        }
    }

    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            Queue::Qa => "qa_queue",
            Queue::Problem => "problem_queue",
        }
    }

    /// Request parameter value
    pub fn as_str(self) -> &'static str {
        match self {
            Queue::Qa => "qa",
            Queue::Problem => "problem",
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Queue {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "qa" => Ok(Queue::Qa),
            "problem" => Ok(Queue::Problem),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown queue '{}' (expected qa or problem)",
                other
            ))),
        }
    }
}

/// Validated record identity
///
/// Identities are opaque strings assigned by the loader (for example 24-char
/// hex object ids). Ordering is plain string ordering, which is the claim
/// order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub const MAX_LEN: usize = 64;

    /// Parse a raw identity reference from a form or path
    ///
    /// # Examples
    ///
    /// ```
    /// use qadesk_common::db::RecordId;
    ///
    /// assert!(RecordId::parse("65f1c0a2b3d4e5f601234567").is_some());
    /// assert!(RecordId::parse("").is_none());
    /// assert!(RecordId::parse("1; DROP TABLE").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| RecordId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending record in either work queue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueueRecord {
    pub id: String,
    pub label: Option<String>,
    pub number: Option<String>,
    /// Contributor's free-text note
    pub description: Option<String>,
    /// Product image reference
    pub image_url: Option<String>,
    pub image_count: Option<i64>,
    pub batch_code: Option<String>,
    pub contributor: Option<String>,
    pub contributed_at: Option<String>,
    /// Link back to the record's source page
    pub jump_url: Option<String>,
    /// Finalized? Must be explicitly false for the record to be claimable.
    pub record_status: Option<bool>,
    /// Currently claimed by an operator
    pub lock: Option<bool>,
    /// Routed away from claiming
    pub skipped: Option<bool>,
}

impl QueueRecord {
    /// New unclaimed, unfinalized record with only an identity
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_status: Some(false),
            lock: Some(false),
            skipped: Some(false),
            ..Default::default()
        }
    }

    /// Claimable: `record_status = false`, `lock != true`, `skipped != true`
    pub fn is_claimable(&self) -> bool {
        self.record_status == Some(false) && self.lock != Some(true) && self.skipped != Some(true)
    }

    /// Still held by a claim and not yet finalized
    pub fn is_submittable(&self) -> bool {
        self.lock == Some(true) && self.record_status == Some(false)
    }
}

/// A finalized, reviewed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArchiveRecord {
    pub id: String,
    pub label: String,
    pub number: String,
    pub title: String,
    /// Contributor's original note
    pub note: String,
    /// Reviewer-written description
    pub description: String,
    pub product_image: String,
    pub image_count: i64,
    pub batch_code: String,
    pub contributor: String,
    pub contributed_at: String,
    pub reviewer: String,
    pub reviewed_at: String,
    pub record_status: bool,
    pub jump_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_from_param() {
        assert_eq!(Queue::from_param(None), Queue::Qa);
        assert_eq!(Queue::from_param(Some("qa")), Queue::Qa);
        assert_eq!(Queue::from_param(Some("problem")), Queue::Problem);
        assert_eq!(Queue::from_param(Some("anything")), Queue::Qa);
    }

    #[test]
    fn test_queue_from_str_rejects_unknown() {
        assert_eq!("problem".parse::<Queue>().unwrap(), Queue::Problem);
        assert!("done".parse::<Queue>().is_err());
    }

    #[test]
    fn test_record_id_validation() {
        assert_eq!(RecordId::parse(" abc-123_X ").unwrap().as_str(), "abc-123_X");
        assert!(RecordId::parse(&"a".repeat(RecordId::MAX_LEN + 1)).is_none());
        assert!(RecordId::parse("a b").is_none());
        assert!(RecordId::parse("../x").is_none());
    }

    #[test]
    fn test_claimable_predicate() {
        let mut record = QueueRecord::pending("a");
        assert!(record.is_claimable());

        record.lock = None;
        record.skipped = None;
        assert!(record.is_claimable(), "absent lock/skipped still claimable");

        record.record_status = None;
        assert!(!record.is_claimable(), "record_status must be explicitly false");

        let mut locked = QueueRecord::pending("b");
        locked.lock = Some(true);
        assert!(!locked.is_claimable());
        assert!(locked.is_submittable());

        let mut skipped = QueueRecord::pending("c");
        skipped.skipped = Some(true);
        assert!(!skipped.is_claimable());
    }
}
