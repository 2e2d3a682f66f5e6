use super::GitRepo;
use crate::error::{GitanalError, Result};
use crate::model::CommitInfo;
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::ObjectId;
use similar::TextDiff;

const CONTEXT_LINES: usize = 3;

pub(crate) fn first_parent_diff(repo: &GitRepo, commit: &CommitInfo) -> Result<Option<String>> {
    let Some(parent) = commit.parent_ids.first() else {
        return Ok(None);
    };
    let commit_id = parse_id(&commit.id)?;
    let parent_id = parse_id(parent)?;

    let repo = repo.repository();
    let commit_tree = repo.find_commit(commit_id)?.tree()?;
    let parent_tree = repo.find_commit(parent_id)?.tree()?;
    let changes: Vec<ChangeDetached> =
        repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?;

    let mut out = String::new();
    for change in changes {
        match change {
            ChangeDetached::Addition { id, location, entry_mode, .. } => {
                if !is_file(entry_mode) {
                    continue;
                }
                let path = location.to_string();
                let new = blob(repo, id)?;
                out.push_str(&format!("diff --git a/{path} b/{path}\nnew file\n"));
                push_file_diff(&mut out, None, Some(&path), &[], &new);
            }
            ChangeDetached::Deletion { id, location, entry_mode, .. } => {
                if !is_file(entry_mode) {
                    continue;
                }
                let path = location.to_string();
                let old = blob(repo, id)?;
                out.push_str(&format!("diff --git a/{path} b/{path}\ndeleted file\n"));
                push_file_diff(&mut out, Some(&path), None, &old, &[]);
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if !is_file(entry_mode) {
                    continue;
                }
                let path = location.to_string();
                let (old, new) = (blob(repo, previous_id)?, blob(repo, id)?);
                out.push_str(&format!("diff --git a/{path} b/{path}\n"));
                push_file_diff(&mut out, Some(&path), Some(&path), &old, &new);
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                source_location,
                location,
                entry_mode,
                copy,
                ..
            } => {
                if !is_file(entry_mode) {
                    continue;
                }
                let (from, to) = (source_location.to_string(), location.to_string());
                let (old, new) = (blob(repo, source_id)?, blob(repo, id)?);
                let verb = if copy { "copy" } else { "rename" };
                out.push_str(&format!(
                    "diff --git a/{from} b/{to}\n{verb} from {from}\n{verb} to {to}\n"
                ));
                push_file_diff(&mut out, Some(&from), Some(&to), &old, &new);
            }
        }
    }

    Ok(Some(out))
}

fn parse_id(hex: &str) -> Result<ObjectId> {
    ObjectId::from_hex(hex.as_bytes())
        .map_err(|e| GitanalError::GitRepo(format!("Invalid commit ID '{hex}': {e}")))
}

/// Trees are walked into by the tree diff and submodule commits live in other stores.
fn is_file(mode: EntryMode) -> bool {
    !mode.is_tree() && !mode.is_commit()
}

fn blob(repo: &gix::Repository, id: ObjectId) -> Result<Vec<u8>> {
    Ok(repo.find_object(id)?.detach().data)
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

fn push_file_diff(out: &mut String, old_path: Option<&str>, new_path: Option<&str>, old: &[u8], new: &[u8]) {
    let old_label = old_path.map_or_else(|| "/dev/null".to_string(), |p| format!("a/{p}"));
    let new_label = new_path.map_or_else(|| "/dev/null".to_string(), |p| format!("b/{p}"));

    if is_binary(old) || is_binary(new) {
        out.push_str(&format!("Binary files {old_label} and {new_label} differ\n"));
        return;
    }

    out.push_str(&unified_diff(
        &String::from_utf8_lossy(old),
        &String::from_utf8_lossy(new),
        &old_label,
        &new_label,
    ));
}

pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(old_label, new_label)
        .to_string()
}
