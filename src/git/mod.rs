pub mod diff;
pub mod repo;

pub use repo::GitRepo;

use crate::error::Result;
use crate::model::{CommitInfo, RepoConfig};
use std::path::Path;

/// Read-only access to one repository, as needed by filtering and rendering.
pub trait CommitSource {
    /// Location of the repository store, used as the repository identity.
    fn git_dir(&self) -> &Path;

    /// Local branch names in the order the store lists them.
    fn branch_names(&self) -> Result<Vec<String>>;

    fn config(&self) -> RepoConfig;

    /// Visit every commit reachable from the tip of `branch`, each exactly once.
    ///
    /// Commits handed to `visit` before an error is returned stay valid.
    fn walk_branch(&self, branch: &str, visit: &mut dyn FnMut(CommitInfo)) -> Result<()>;

    /// Unified diff of `commit` against its first parent, `None` for root commits.
    fn first_parent_diff(&self, commit: &CommitInfo) -> Result<Option<String>>;

    fn display_name(&self) -> String {
        display_name(self.git_dir())
    }
}

/// Base name of the working tree owning `git_dir`.
pub fn display_name(git_dir: &Path) -> String {
    let dir = match git_dir.file_name() {
        Some(name) if name == ".git" => git_dir.parent().unwrap_or(git_dir),
        _ => git_dir,
    };
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned())
}
