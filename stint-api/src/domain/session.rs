use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Server-side lifecycle of a work session. `Completed` is terminal: no
/// procedure transitions out of it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

/// One persisted time-tracking interval on a GitHub issue.
///
/// `duration_seconds` holds only the closed segments; while the session is
/// active, the open segment runs from `last_resumed_at` and is folded in by
/// pause/complete.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: i32,
    pub user_id: i32,
    pub issue_owner: String,
    pub issue_repo: String,
    pub issue_number: i64,
    pub issue_title: Option<String>,
    pub issue_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_resumed_at: OffsetDateTime,
    pub duration_seconds: i64,
    pub status: SessionStatus,
    pub notes: Option<String>,
    pub participants: Vec<String>,
}

pub struct NewWorkSession {
    pub user_id: i32,
    pub issue_owner: String,
    pub issue_repo: String,
    pub issue_number: i64,
    pub issue_title: Option<String>,
    pub issue_url: String,
    pub notes: Option<String>,
    pub participants: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_status_roundtrips_through_strings() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Paused,
            SessionStatus::Completed,
        ] {
            let parsed = SessionStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(
            SessionStatus::from_str("Paused").unwrap(),
            SessionStatus::Paused
        );
    }
}
