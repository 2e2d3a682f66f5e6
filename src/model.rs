use crate::error::GitanalError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// A single revision read out of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub parent_ids: Vec<String>,
}

impl CommitInfo {
    /// First line of the message, trimmed.
    pub fn summary(&self) -> &str {
        self.message.trim().lines().next().unwrap_or("").trim()
    }
}

/// Which authors a commit must belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserFilter {
    #[default]
    Unrestricted,
    Explicit(Vec<String>),
    /// Resolved per repository against its configured `user.name`.
    CurrentUser,
}

impl FromStr for UserFilter {
    type Err = GitanalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(UserFilter::Unrestricted);
        }
        if let Some(cmd) = s.strip_prefix('^') {
            return match cmd {
                "ALL" => Ok(UserFilter::Unrestricted),
                "CURRENT" => Ok(UserFilter::CurrentUser),
                _ => Err(GitanalError::InvalidFilterValue(s.to_string())),
            };
        }

        let names: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(GitanalError::InvalidFilterValue(s.to_string()));
        }
        Ok(UserFilter::Explicit(names))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    User,
    Repo,
}

impl FromStr for GroupBy {
    type Err = GitanalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(GroupBy::User),
            "repo" => Ok(GroupBy::Repo),
            other => Err(GitanalError::InvalidGroupBy(other.to_string())),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::User => f.write_str("user"),
            GroupBy::Repo => f.write_str("repo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Html,
}

impl FromStr for OutputFormat {
    type Err = GitanalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "html" => Ok(OutputFormat::Html),
            other => Err(GitanalError::InvalidOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => f.write_str("plain"),
            OutputFormat::Html => f.write_str("html"),
        }
    }
}

/// Configuration values of a repository that the commit predicate may consult.
#[derive(Debug, Clone, Default)]
pub struct RepoConfig {
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub users: UserFilter,
    /// Inclusive lower bound on the authored timestamp.
    pub since: Option<DateTime<Utc>>,
}

/// A matching commit together with the repository it was read from.
#[derive(Debug)]
pub struct CommitRecord<'r, R: ?Sized> {
    pub repo: &'r R,
    pub commit: CommitInfo,
}

impl<R: ?Sized> Clone for CommitRecord<'_, R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo,
            commit: self.commit.clone(),
        }
    }
}
