use crate::git::CommitSource;
use crate::model::CommitRecord;
use std::path::PathBuf;

/// A run of items sharing the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K, T> {
    pub key: K,
    pub items: Vec<T>,
}

/// Stable-sort `items` by `key` and split them into runs of equal key.
///
/// Groups come out in ascending key order; items keep their input order within a group.
pub fn group_by<T, K, F>(mut items: Vec<T>, key: F) -> Vec<Group<K, T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by_cached_key(|item| key(item));

    let mut groups: Vec<Group<K, T>> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.last_mut() {
            Some(group) if group.key == k => group.items.push(item),
            _ => groups.push(Group { key: k, items: vec![item] }),
        }
    }
    groups
}

pub fn by_author_email<R: CommitSource + ?Sized>(record: &CommitRecord<'_, R>) -> String {
    record.commit.author_email.clone()
}

pub fn by_repository<R: CommitSource + ?Sized>(record: &CommitRecord<'_, R>) -> PathBuf {
    record.repo.git_dir().to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::{commit, day, FakeRepo};
    use pretty_assertions::assert_eq;

    fn records<'r>(a: &'r FakeRepo, b: &'r FakeRepo) -> Vec<CommitRecord<'r, FakeRepo>> {
        vec![
            CommitRecord { repo: b, commit: commit("1", "bob", "bob@y.com", day(4), &[]) },
            CommitRecord { repo: a, commit: commit("2", "al", "al@x.com", day(3), &[]) },
            CommitRecord { repo: a, commit: commit("3", "bob", "bob@y.com", day(2), &[]) },
            CommitRecord { repo: b, commit: commit("4", "al", "al@x.com", day(1), &[]) },
            CommitRecord { repo: a, commit: commit("5", "al", "al@x.com", day(0), &[]) },
        ]
    }

    fn ids<R: ?Sized>(items: &[CommitRecord<'_, R>]) -> Vec<String> {
        items.iter().map(|r| r.commit.id.clone()).collect()
    }

    #[test]
    fn groups_are_sorted_by_key_and_keep_input_order() {
        let groups = group_by(vec![3, 10, 1, 12, 5, 23], |n| n % 2);
        assert_eq!(
            groups,
            vec![
                Group { key: 0, items: vec![10, 12] },
                Group { key: 1, items: vec![3, 1, 5, 23] },
            ]
        );
    }

    #[test]
    fn empty_input_has_no_groups() {
        let groups: Vec<Group<u8, u8>> = group_by(Vec::new(), |n| *n);
        assert!(groups.is_empty());
    }

    #[test]
    fn grouping_by_user_preserves_every_record() {
        let (a, b) = (FakeRepo::new("/w/a/.git"), FakeRepo::new("/w/b/.git"));
        let input = records(&a, &b);
        let groups = group_by(input.clone(), by_author_email);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["al@x.com", "bob@y.com"]);
        assert_eq!(ids(&groups[0].items), vec!["2", "4", "5"]);
        assert_eq!(ids(&groups[1].items), vec!["1", "3"]);

        let mut flat: Vec<String> = groups.into_iter().flat_map(|g| ids(&g.items)).collect();
        flat.sort();
        let mut expected = ids(&input);
        expected.sort();
        assert_eq!(flat, expected);
    }

    #[test]
    fn grouping_by_repository_uses_store_location() {
        let (a, b) = (FakeRepo::new("/w/a/.git"), FakeRepo::new("/w/b/.git"));
        let groups = group_by(records(&a, &b), by_repository);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, PathBuf::from("/w/a/.git"));
        assert_eq!(ids(&groups[0].items), vec!["2", "3", "5"]);
        assert_eq!(ids(&groups[1].items), vec!["1", "4"]);
    }

    #[test]
    fn nested_grouping_neither_loses_nor_duplicates() {
        let (a, b) = (FakeRepo::new("/w/a/.git"), FakeRepo::new("/w/b/.git"));
        let input = records(&a, &b);
        let total = input.len();

        let mut seen = Vec::new();
        for user in group_by(input, by_author_email) {
            let user_total = user.items.len();
            let repos = group_by(user.items, by_repository);
            assert_eq!(repos.iter().map(|g| g.items.len()).sum::<usize>(), user_total);
            for repo in repos {
                assert!(repo.items.iter().all(|r| r.commit.author_email == user.key));
                seen.extend(ids(&repo.items));
            }
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
