use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::Author;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IssueComment {
    pub id: i64,
    pub html_url: String,
    pub body: String,
    pub user: Option<Author>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
