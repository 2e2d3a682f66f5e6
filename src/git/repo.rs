use super::CommitSource;
use crate::error::{GitanalError, Result};
use crate::model::{CommitInfo, RepoConfig};
use chrono::DateTime;
use gix::{ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    git_dir: PathBuf,
}

impl GitRepo {
    /// Open the repository store at `git_dir`.
    pub fn open<P: AsRef<Path>>(git_dir: P) -> Result<Self> {
        let git_dir = git_dir.as_ref().to_path_buf();
        let repo = gix::open(git_dir.clone()).map_err(|e| {
            tracing::debug!("Cannot open {} as a repository: {}", git_dir.display(), e);
            GitanalError::InvalidRepository(git_dir.clone())
        })?;

        Ok(Self { repo, git_dir })
    }

    pub(crate) fn repository(&self) -> &Repository {
        &self.repo
    }

    fn branch_tip(&self, branch: &str) -> Result<ObjectId> {
        let mut reference = self.repo.find_reference(format!("refs/heads/{branch}").as_str())?;
        let id = reference
            .peel_to_id_in_place()
            .map_err(|e| GitanalError::GitRepo(format!("Cannot resolve branch '{branch}': {e}")))?;
        Ok(id.detach())
    }

    fn read_commit(&self, commit_id: ObjectId) -> Result<(CommitInfo, Vec<ObjectId>)> {
        let commit = self.repo.find_commit(commit_id)?;
        let author = commit.author()?;
        let secs = author
            .time()
            .map_err(|e| GitanalError::GitRepo(format!("Invalid author time in {commit_id}: {e}")))?
            .seconds;
        let timestamp = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| GitanalError::GitRepo(format!("Invalid timestamp: {secs}")))?;

        let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

        let info = CommitInfo {
            id: commit_id.to_string(),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            message: commit.message_raw()?.to_string(),
            timestamp,
            parent_ids: parents.iter().map(|id| id.to_string()).collect(),
        };
        Ok((info, parents))
    }
}

impl CommitSource for GitRepo {
    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn branch_names(&self) -> Result<Vec<String>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| GitanalError::GitRepo(format!("Cannot list references: {e}")))?;
        let branches = platform
            .local_branches()
            .map_err(|e| GitanalError::GitRepo(format!("Cannot list branches: {e}")))?;

        let mut names = Vec::new();
        for reference in branches {
            let reference =
                reference.map_err(|e| GitanalError::GitRepo(format!("Unreadable branch: {e}")))?;
            names.push(reference.name().shorten().to_string());
        }
        Ok(names)
    }

    fn config(&self) -> RepoConfig {
        let user_name = self
            .repo
            .config_snapshot()
            .string("user.name")
            .map(|v| v.to_string());
        RepoConfig { user_name }
    }

    fn walk_branch(&self, branch: &str, visit: &mut dyn FnMut(CommitInfo)) -> Result<()> {
        let tip = self.branch_tip(branch)?;

        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut queue: VecDeque<ObjectId> = VecDeque::from([tip]);

        while let Some(commit_id) = queue.pop_front() {
            if !seen.insert(commit_id) {
                continue;
            }
            let (info, parents) = self.read_commit(commit_id)?;
            queue.extend(parents);
            visit(info);
        }

        Ok(())
    }

    fn first_parent_diff(&self, commit: &CommitInfo) -> Result<Option<String>> {
        super::diff::first_parent_diff(self, commit)
    }
}
