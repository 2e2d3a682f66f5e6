use crate::aggregate::{by_author_email, by_repository, group_by};
use crate::error::Result;
use crate::git::CommitSource;
use crate::model::{CommitRecord, GroupBy};
use crate::util::format_commit;
use std::io::Write;

/// Write the nested listing of `records` to `out`.
///
/// Grouped by user: email, then repository (indented once), then commits
/// (indented twice). Grouped by repository the first two levels swap.
pub fn write_plain_report<W, R>(out: &mut W, records: Vec<CommitRecord<'_, R>>, group: GroupBy) -> Result<()>
where
    W: Write,
    R: CommitSource + ?Sized,
{
    match group {
        GroupBy::User => {
            for user in group_by(records, by_author_email) {
                writeln!(out, "{}", user.key)?;
                for repo in group_by(user.items, by_repository) {
                    if let Some(first) = repo.items.first() {
                        writeln!(out, " {}", first.repo.display_name())?;
                    }
                    for record in &repo.items {
                        writeln!(out, "  {}", format_commit(&record.commit))?;
                    }
                }
            }
        }
        GroupBy::Repo => {
            for repo in group_by(records, by_repository) {
                if let Some(first) = repo.items.first() {
                    writeln!(out, "{}", first.repo.display_name())?;
                }
                for user in group_by(repo.items, by_author_email) {
                    writeln!(out, " {}", user.key)?;
                    for record in &user.items {
                        writeln!(out, "  {}", format_commit(&record.commit))?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::{commit, day, FakeRepo};
    use pretty_assertions::assert_eq;

    fn render(records: Vec<CommitRecord<'_, FakeRepo>>, group: GroupBy) -> String {
        let mut out = Vec::new();
        write_plain_report(&mut out, records, group).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn group_by_user_nests_repositories() {
        let (a, b) = (FakeRepo::new("/w/alpha/.git"), FakeRepo::new("/w/beta/.git"));
        let records = vec![
            CommitRecord { repo: &b, commit: commit("1", "bob", "bob@y.com", day(4), &[]) },
            CommitRecord { repo: &a, commit: commit("2", "al", "al@x.com", day(3), &[]) },
            CommitRecord { repo: &b, commit: commit("3", "al", "al@x.com", day(1), &[]) },
        ];

        assert_eq!(
            render(records, GroupBy::User),
            "al@x.com\n \
             alpha\n  (2024-01-04 12:00:00) al@x.com >> change 2\n \
             beta\n  (2024-01-02 12:00:00) al@x.com >> change 3\n\
             bob@y.com\n \
             beta\n  (2024-01-05 12:00:00) bob@y.com >> change 1\n"
        );
    }

    #[test]
    fn group_by_repo_nests_users() {
        let (a, b) = (FakeRepo::new("/w/alpha/.git"), FakeRepo::new("/w/beta/.git"));
        let records = vec![
            CommitRecord { repo: &b, commit: commit("1", "bob", "bob@y.com", day(4), &[]) },
            CommitRecord { repo: &a, commit: commit("2", "al", "al@x.com", day(3), &[]) },
            CommitRecord { repo: &b, commit: commit("3", "al", "al@x.com", day(1), &[]) },
        ];

        assert_eq!(
            render(records, GroupBy::Repo),
            "alpha\n al@x.com\n  (2024-01-04 12:00:00) al@x.com >> change 2\n\
             beta\n al@x.com\n  (2024-01-02 12:00:00) al@x.com >> change 3\n \
             bob@y.com\n  (2024-01-05 12:00:00) bob@y.com >> change 1\n"
        );
    }

    #[test]
    fn no_records_no_output() {
        assert_eq!(render(Vec::new(), GroupBy::User), "");
    }
}
