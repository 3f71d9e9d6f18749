use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use gh_client::{GitHubClient, Issue, IssueRef, Organization, Repository};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{auth::AuthUser, AppState};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orgs", get(get_organizations))
        .route("/orgs/:org/repos", get(get_org_repositories))
        .route("/repos/:owner/:repo/issues", get(get_issues))
        .route("/comment", post(post_comment))
}

#[instrument(name = "GET /github/orgs", skip(user))]
async fn get_organizations(user: AuthUser) -> Result<Json<Vec<Organization>>, ApiError> {
    let client = GitHubClient::new(user.access_token.clone());
    let orgs = client.get_organizations().await?;

    Ok(Json(orgs))
}

#[instrument(name = "GET /github/orgs/:org/repos", skip(user))]
async fn get_org_repositories(
    user: AuthUser,
    Path(org): Path<String>,
) -> Result<Json<Vec<Repository>>, ApiError> {
    let client = GitHubClient::new(user.access_token.clone());
    let repos = client.get_org_repositories(&org).await?;

    Ok(Json(repos))
}

#[instrument(name = "GET /github/repos/:owner/:repo/issues", skip(user))]
async fn get_issues(
    user: AuthUser,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let client = GitHubClient::new(user.access_token.clone());
    let issues = client.get_issues(&owner, &repo).await?;

    Ok(Json(issues))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostCommentBody {
    owner: String,
    repo: String,
    issue_number: u64,
    comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostCommentResponse {
    comment_url: String,
}

/// Posts a time-tracking comment on the issue, on behalf of the logged-in
/// user.
#[instrument(name = "POST /github/comment", skip(user, body))]
async fn post_comment(
    user: AuthUser,
    Json(body): Json<PostCommentBody>,
) -> Result<Json<PostCommentResponse>, ApiError> {
    let issue = IssueRef {
        owner: body.owner,
        repo: body.repo,
        number: body.issue_number,
    };

    let client = GitHubClient::new(user.access_token.clone());
    let comment = client.create_issue_comment(&issue, &body.comment).await?;

    Ok(Json(PostCommentResponse {
        comment_url: comment.html_url,
    }))
}
