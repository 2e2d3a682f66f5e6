use crate::model::CommitInfo;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One-line rendering: `(<timestamp>) <email> >> <summary>`.
pub fn format_commit(commit: &CommitInfo) -> String {
    format!(
        "({}) {} >> {}",
        commit.timestamp.format(TIMESTAMP_FORMAT),
        commit.author_email,
        commit.summary()
    )
}

/// File name of the per-user HTML page for `user`.
///
/// Bytes outside `[A-Za-z0-9@.+-]` are written as `_XX` (upper-case hex), `_` included,
/// so distinct keys never share a page.
pub fn user_file_name(user: &str) -> String {
    let mut key = String::with_capacity(user.len());
    for b in user.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'@' | b'.' | b'+' | b'-') {
            key.push(char::from(b));
        } else {
            key.push_str(&format!("_{b:02X}"));
        }
    }
    format!("user_{key}.html")
}
