use super::{CommitView, Renderer, RepoSection, UserLink};
use crate::aggregate::{by_author_email, by_repository, group_by};
use crate::error::{GitanalError, Result};
use crate::git::CommitSource;
use crate::model::{CommitRecord, GroupBy};
use crate::util::{format_commit, user_file_name};
use std::fs;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "users.html";

/// Write one page per user plus the `users.html` index into `out_dir`.
///
/// Only grouping by user is supported; any other grouping fails before
/// anything is written. Returns the written paths, index last.
pub fn write_html_report<R>(
    renderer: &Renderer,
    records: Vec<CommitRecord<'_, R>>,
    group: GroupBy,
    out_dir: &Path,
) -> Result<Vec<PathBuf>>
where
    R: CommitSource + ?Sized,
{
    if group != GroupBy::User {
        return Err(GitanalError::InvalidGroupBy(group.to_string()));
    }

    fs::create_dir_all(out_dir).map_err(|source| GitanalError::RenderWrite {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    let mut users = Vec::new();

    for user in group_by(records, by_author_email) {
        let mut sections = Vec::new();
        for repo in group_by(user.items, by_repository) {
            let Some(first) = repo.items.first() else {
                continue;
            };
            let name = first.repo.display_name();

            let mut commits = Vec::with_capacity(repo.items.len());
            for record in &repo.items {
                commits.push(CommitView {
                    message: format_commit(&record.commit),
                    sha: record.commit.id.clone(),
                    diff: record.repo.first_parent_diff(&record.commit)?,
                });
            }
            sections.push(RepoSection { name, commits });
        }
        sections.sort_by(|a, b| a.name.cmp(&b.name));

        let file_name = user_file_name(&user.key);
        let page = renderer.render_repos_commits(&user.key, &sections)?;
        written.push(write_file(out_dir, &file_name, &page)?);
        users.push(UserLink {
            username: user.key,
            url: file_name,
        });
    }

    let index = renderer.render_users(&users)?;
    written.push(write_file(out_dir, INDEX_FILE, &index)?);

    Ok(written)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    tracing::info!("Writing {}", path.display());
    fs::write(&path, contents.as_bytes()).map_err(|source| GitanalError::RenderWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::{commit, day, FakeRepo};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn writes_user_pages_and_index() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("report");
        let (a, b) = (FakeRepo::new("/w/zeta/.git"), FakeRepo::new("/w/alpha/.git"));
        let records = vec![
            CommitRecord { repo: &a, commit: commit("c2", "al", "al@x.com", day(2), &["c1"]) },
            CommitRecord { repo: &b, commit: commit("r1", "al", "al@x.com", day(1), &[]) },
            CommitRecord { repo: &a, commit: commit("c9", "bo", "bo@y.com", day(3), &["c2"]) },
        ];

        let renderer = Renderer::new(None).unwrap();
        let written = write_html_report(&renderer, records, GroupBy::User, &out).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["user_al@x.com.html", "user_bo@y.com.html", "users.html"]);

        let index = fs::read_to_string(out.join("users.html")).unwrap();
        assert!(index.contains("href=\"user_al@x.com.html\""));
        assert!(index.contains("href=\"user_bo@y.com.html\""));

        let page = fs::read_to_string(out.join("user_al@x.com.html")).unwrap();
        let alpha = page.find("<h2>alpha</h2>").unwrap();
        let zeta = page.find("<h2>zeta</h2>").unwrap();
        assert!(alpha < zeta, "sections are ordered by repository name");
        assert!(page.contains("diff c1..c2"));
        assert!(page.contains("r1"));
    }

    #[test]
    fn similar_emails_get_separate_pages() {
        let dir = tempdir().unwrap();
        let a = FakeRepo::new("/w/alpha/.git");
        let records = vec![
            CommitRecord { repo: &a, commit: commit("spaced1", "sp", "a b@x.com", day(1), &[]) },
            CommitRecord { repo: &a, commit: commit("under1", "us", "a_b@x.com", day(2), &[]) },
        ];

        let renderer = Renderer::new(None).unwrap();
        let written = write_html_report(&renderer, records, GroupBy::User, dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let spaced = fs::read_to_string(dir.path().join("user_a_20b@x.com.html")).unwrap();
        let underscored = fs::read_to_string(dir.path().join("user_a_5Fb@x.com.html")).unwrap();
        assert!(spaced.contains("spaced1") && !spaced.contains("under1"));
        assert!(underscored.contains("under1") && !underscored.contains("spaced1"));

        let index = fs::read_to_string(dir.path().join("users.html")).unwrap();
        assert!(index.contains("href=\"user_a_20b@x.com.html\""));
        assert!(index.contains("href=\"user_a_5Fb@x.com.html\""));
    }

    #[test]
    fn root_commits_render_without_diff() {
        let dir = tempdir().unwrap();
        let a = FakeRepo::new("/w/alpha/.git");
        let records = vec![CommitRecord { repo: &a, commit: commit("r1", "al", "al@x.com", day(1), &[]) }];

        let renderer = Renderer::new(None).unwrap();
        write_html_report(&renderer, records, GroupBy::User, dir.path()).unwrap();

        let page = fs::read_to_string(dir.path().join("user_al@x.com.html")).unwrap();
        assert!(!page.contains("class=\"diff\""));
    }

    #[test]
    fn grouping_by_repository_is_rejected_without_writing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("report");
        let a = FakeRepo::new("/w/alpha/.git");
        let records = vec![CommitRecord { repo: &a, commit: commit("r1", "al", "al@x.com", day(1), &[]) }];

        let renderer = Renderer::new(None).unwrap();
        let err = write_html_report(&renderer, records, GroupBy::Repo, &out).unwrap_err();
        assert!(matches!(err, GitanalError::InvalidGroupBy(ref v) if v == "repo"));
        assert!(!out.exists());
    }
}
