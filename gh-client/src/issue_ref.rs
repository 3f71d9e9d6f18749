use std::fmt;

use thiserror::Error;
use url::Url;

/// The coordinates GitHub needs to address an issue.
///
/// Built from an issue URL of the shape
/// `https://github.com/{owner}/{repo}/issues/{number}`. Trailing slashes and
/// query strings are tolerated; anything else is rejected instead of
/// producing a wrong owner/repo pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueRefError {
    #[error("unrecognized issue URL: {0}")]
    UnrecognizedUrl(String),
}

impl IssueRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    pub fn from_url(raw: &str) -> Result<Self, IssueRefError> {
        let url =
            Url::parse(raw).map_err(|_| IssueRefError::UnrecognizedUrl(raw.to_string()))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, "issues", number] => {
                let number = number
                    .parse::<u64>()
                    .map_err(|_| IssueRefError::UnrecognizedUrl(raw.to_string()))?;
                Ok(Self::new(*owner, *repo, number))
            }
            _ => Err(IssueRefError::UnrecognizedUrl(raw.to_string())),
        }
    }

    /// REST path of the issue itself.
    pub fn issue_path(&self) -> String {
        format!("/repos/{}/{}/issues/{}", self.owner, self.repo, self.number)
    }

    /// REST path of the issue's comment collection.
    pub fn comments_path(&self) -> String {
        format!("{}/comments", self.issue_path())
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_issue_url() {
        assert_eq!(
            IssueRef::from_url("https://github.com/rust-lang/rust/issues/1234").unwrap(),
            IssueRef::new("rust-lang", "rust", 1234)
        );
    }

    #[test]
    fn test_trailing_slash_and_query_string() {
        assert_eq!(
            IssueRef::from_url("https://github.com/a/b/issues/7/").unwrap(),
            IssueRef::new("a", "b", 7)
        );
        assert_eq!(
            IssueRef::from_url("https://github.com/a/b/issues/7?foo=bar").unwrap(),
            IssueRef::new("a", "b", 7)
        );
    }

    #[test]
    fn test_rejects_pull_request_url() {
        assert!(matches!(
            IssueRef::from_url("https://github.com/a/b/pull/7"),
            Err(IssueRefError::UnrecognizedUrl(_))
        ));
    }

    #[test]
    fn test_rejects_other_path_shapes() {
        for url in [
            "https://github.com/a/b",
            "https://gitlab.com/a/b/-/issues/7",
            "https://github.com/a/b/issues/not-a-number",
            "not a url at all",
        ] {
            assert!(IssueRef::from_url(url).is_err(), "should reject: {}", url);
        }
    }

    #[test]
    fn test_paths() {
        let issue = IssueRef::new("a", "b", 7);
        assert_eq!(issue.issue_path(), "/repos/a/b/issues/7");
        assert_eq!(issue.comments_path(), "/repos/a/b/issues/7/comments");
        assert_eq!(issue.to_string(), "a/b#7");
    }
}
