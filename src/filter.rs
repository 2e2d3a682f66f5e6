use crate::git::CommitSource;
use crate::model::{CommitInfo, FilterParams, RepoConfig, UserFilter};
use std::collections::HashSet;

/// Whether `commit` satisfies both the author and the since clause of `params`.
pub fn commit_filter(cfg: &RepoConfig, commit: &CommitInfo, params: &FilterParams) -> bool {
    let user_ok = match &params.users {
        UserFilter::Unrestricted => true,
        UserFilter::Explicit(names) => names.iter().any(|n| *n == commit.author_name),
        UserFilter::CurrentUser => cfg.user_name.as_deref() == Some(commit.author_name.as_str()),
    };

    let since_ok = match params.since {
        Some(since) => commit.timestamp >= since,
        None => true,
    };

    user_ok && since_ok
}

/// Commits of `repo` accepted by `pred` on every allowed branch, newest first.
///
/// A commit reachable from several branches is reported once per branch. A
/// traversal error is logged and ends processing of this repository; commits
/// collected until then are kept.
pub fn filter_commits<R, P>(
    repo: &R,
    pred: P,
    branches: Option<&HashSet<String>>,
    params: &FilterParams,
) -> Vec<CommitInfo>
where
    R: CommitSource + ?Sized,
    P: Fn(&RepoConfig, &CommitInfo, &FilterParams) -> bool,
{
    let cfg = repo.config();
    if params.users == UserFilter::CurrentUser && cfg.user_name.is_none() {
        tracing::warn!(
            "No user.name configured for {}, current-user filter matches nothing",
            repo.git_dir().display()
        );
    }

    let mut commits = Vec::new();
    let result = repo.branch_names().and_then(|names| {
        for branch in names {
            if branches.is_some_and(|allowed| !allowed.contains(&branch)) {
                continue;
            }
            tracing::trace!("Walking branch {} of {}", branch, repo.git_dir().display());
            repo.walk_branch(&branch, &mut |c: CommitInfo| {
                if pred(&cfg, &c, params) {
                    commits.push(c);
                }
            })?;
        }
        Ok(())
    });

    if let Err(e) = result {
        let err = crate::error::GitanalError::BranchTraversal {
            repo: repo.git_dir().display().to_string(),
            message: e.to_string(),
        };
        tracing::error!("{}", err);
    }

    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    commits
}
