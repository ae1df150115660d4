//! Line-level diff between a HEAD blob and the working tree.
//!
//! The backend needs a small, dependency-free unified diff for the
//! tutorial's `git diff` output. Lines are aligned with a longest common
//! subsequence table (the classic O(m·n) dynamic program); the backward walk
//! over the table emits a minimal sequence of context/add/remove operations.
//!
//! Tie-break: when the delete and insert directions score equally, the walk
//! takes the insert direction first, so a replaced line reads as the removed
//! line followed by its replacement.

use std::fmt;

/// One line-level edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Context(line) => write!(f, " {line}"),
            DiffLine::Added(line) => write!(f, "+{line}"),
            DiffLine::Removed(line) => write!(f, "-{line}"),
        }
    }
}

/// Compute the line operations turning `old` into `new`.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = split_lines(old);
    let new_lines: Vec<&str> = split_lines(new);

    let m = old_lines.len();
    let n = new_lines.len();

    // lcs[i][j] = LCS length of old[..i] and new[..j]
    let mut lcs = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            lcs[i][j] = if old_lines[i - 1] == new_lines[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    let mut ops = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            ops.push(DiffLine::Context(old_lines[i - 1].to_string()));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            ops.push(DiffLine::Added(new_lines[j - 1].to_string()));
            j -= 1;
        } else {
            ops.push(DiffLine::Removed(old_lines[i - 1].to_string()));
            i -= 1;
        }
    }
    ops.reverse();
    ops
}

/// Render a unified-diff-like block for one path.
///
/// Returns a "No changes" stub when old and new content are identical.
pub fn format_unified(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return format!("No changes in {path}");
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{path} b/{path}\n"));
    out.push_str(&format!("--- a/{path}\n"));
    out.push_str(&format!("+++ b/{path}\n"));
    for op in diff_lines(old, new) {
        out.push_str(&op.to_string());
        out.push('\n');
    }
    out
}

/// Split into lines without a phantom trailing empty line.
fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    let trimmed = content.strip_suffix('\n').unwrap_or(content);
    trimmed.split('\n').collect()
}
