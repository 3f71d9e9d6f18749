use async_trait::async_trait;
use gh_client::IssueRef;
use serde::{Deserialize, Serialize};

use crate::store::{CommentError, CommentGateway};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentRequest<'a> {
    owner: &'a str,
    repo: &'a str,
    issue_number: u64,
    comment: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentResponse {
    comment_url: String,
}

/// Posts comments through the stint API (`POST /api/github/comment`), which
/// holds the caller's GitHub credentials server-side.
pub struct ApiCommentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ApiCommentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CommentGateway for ApiCommentGateway {
    async fn post_comment(&self, issue: &IssueRef, body: &str) -> Result<String, CommentError> {
        let url = format!(
            "{}/api/github/comment",
            self.base_url.trim_end_matches('/')
        );
        tracing::debug!("posting comment for {} via {}", issue, url);

        let resp = self
            .client
            .post(&url)
            .json(&CommentRequest {
                owner: &issue.owner,
                repo: &issue.repo,
                issue_number: issue.number,
                comment: body,
            })
            .send()
            .await
            .map_err(|e| CommentError::Gateway(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CommentError::Gateway(format!(
                "comment endpoint returned {}",
                resp.status()
            )));
        }

        let parsed: CommentResponse = resp
            .json()
            .await
            .map_err(|e| CommentError::Gateway(e.to_string()))?;

        Ok(parsed.comment_url)
    }
}
