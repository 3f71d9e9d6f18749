use reqwest::{header, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::models::{Issue, IssueComment, Organization, Repository};
use crate::IssueRef;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github+json";
const USER_AGENT: &str = "stint";

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Point the client at a non-default API root (GitHub Enterprise, or a
    /// stub server in tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let resp = self
            .client
            .get(self.url(path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| GitHubError::ResponseError(e.to_string()))?;

        Self::parse_response(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GitHubError> {
        let resp = self
            .client
            .post(self.url(path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .header(header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await
            .map_err(|e| GitHubError::ResponseError(e.to_string()))?;

        Self::parse_response(resp).await
    }

    async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, GitHubError> {
        match resp.status() {
            status if status.is_success() => resp.json::<T>().await.map_err(|e| {
                GitHubError::ParsingError(format!("Failed to parse response as JSON: {}", e))
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GitHubError::Unauthorized),
            StatusCode::NOT_FOUND => Err(GitHubError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(GitHubError::RateLimited),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(GitHubError::ResponseError(format!("{}: {}", status, body)))
            }
        }
    }

    /// Organizations the authenticated user belongs to.
    pub async fn get_organizations(&self) -> Result<Vec<Organization>, GitHubError> {
        self.fetch("/user/orgs").await
    }

    pub async fn get_org_repositories(&self, org: &str) -> Result<Vec<Repository>, GitHubError> {
        self.fetch(&format!("/orgs/{}/repos?per_page=100", org))
            .await
    }

    /// Open issues of a repository. Pull requests share the issues endpoint
    /// on the GitHub side and are filtered out here.
    pub async fn get_issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>, GitHubError> {
        let issues: Vec<Issue> = self
            .fetch(&format!(
                "/repos/{}/{}/issues?state=open&per_page=100",
                owner, repo
            ))
            .await?;

        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    pub async fn get_issue(&self, issue: &IssueRef) -> Result<Issue, GitHubError> {
        self.fetch(&issue.issue_path()).await
    }

    pub async fn create_issue_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> Result<IssueComment, GitHubError> {
        tracing::debug!("posting comment on {}", issue);
        self.post(&issue.comments_path(), &serde_json::json!({ "body": body }))
            .await
    }
}

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("Rate limited")]
    RateLimited,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}
