//! Discovery of repository stores below a root directory.

use crate::error::Result;
use crate::git::GitRepo;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPO_MARKER_SUFFIX: &str = ".git";
pub const DEFAULT_MAXDEPTH: usize = 2;

/// Every directory whose depth below `root` is at most `maxdepth`, parents
/// before children, siblings by name.
///
/// Symbolic links are not followed and repository stores are not descended into.
pub fn walk_dirs(root: &Path, maxdepth: usize) -> Vec<(PathBuf, usize)> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .max_depth(Some(maxdepth))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| !entry.path().parent().is_some_and(is_repo_store))
        .build();

    let mut visited = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        tracing::debug!("Scanning directory {}", entry.path().display());
        visited.push((entry.path().to_path_buf(), entry.depth()));
    }

    visited
}

fn is_repo_store(dir: &Path) -> bool {
    dir.file_name()
        .map(|n| n.to_string_lossy().ends_with(REPO_MARKER_SUFFIX))
        .unwrap_or(false)
        && dir.is_dir()
}

fn parent_name(dir: &Path) -> Option<String> {
    dir.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
}

/// Candidate repository stores, filtered by the base name of their parent directory.
///
/// `root` is canonicalised first so that `.` or `..` roots still have named parents.
pub fn find_repo_dirs(
    root: &Path,
    maxdepth: usize,
    allow: Option<&HashSet<String>>,
) -> Vec<PathBuf> {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    walk_dirs(&root, maxdepth)
        .into_iter()
        .map(|(dir, _)| dir)
        .filter(|dir| is_repo_store(dir))
        .filter(|dir| match allow {
            Some(names) => {
                let keep = parent_name(dir).is_some_and(|n| names.contains(&n));
                if !keep {
                    tracing::debug!("Skipping {} (not in repository filter)", dir.display());
                }
                keep
            }
            None => true,
        })
        .collect()
}

/// Open every repository found below `root`. Directories that fail to open are skipped.
pub fn scan_repositories(
    root: &Path,
    maxdepth: usize,
    allow: Option<&HashSet<String>>,
) -> Result<Vec<GitRepo>> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        )
        .into());
    }

    let mut repos = Vec::new();
    for dir in find_repo_dirs(root, maxdepth, allow) {
        match GitRepo::open(&dir) {
            Ok(repo) => {
                tracing::info!("Found repository at {}", dir.display());
                repos.push(repo);
            }
            Err(e) => tracing::debug!("Skipping {}: {}", dir.display(), e),
        }
    }
    Ok(repos)
}
