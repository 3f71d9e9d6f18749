mod client;
mod issue_ref;
mod models;

pub use client::GitHubClient;
pub use client::GitHubError;
pub use issue_ref::{IssueRef, IssueRefError};
pub use models::*;
