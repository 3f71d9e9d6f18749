use serde::{Deserialize, Serialize};

/// A unit of work currently present in the tracking set.
///
/// `elapsed_seconds` only advances while `is_running`; the one-second ticker
/// owns that increment. The issue URL is kept verbatim — it is parsed into
/// owner/repo/number only at comment-submission time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackedIssue {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub elapsed_seconds: u64,
    pub is_running: bool,
}
