//! Type-safe file status classification.
//!
//! This module maps libgit2 status flags onto the four statuses the tutorial
//! surfaces (added/modified/deleted/untracked), split into the staged
//! (INDEX_*) and unstaged (WT_*) buckets — the Rust-native equivalent of the
//! classic three-way HEAD/workdir/stage status combinations.
//!
//! # Public API
//! - [`FileStatus`]: Enumeration of surfaced statuses
//! - [`FileStatus::from_staged_flags`] / [`FileStatus::from_unstaged_flags`]:
//!   Flag classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// File status surfaced to the tutorial UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Untracked,
}

impl FileStatus {
    /// Classify the staged (index vs HEAD) side of a status entry.
    pub fn from_staged_flags(flags: git2::Status) -> Option<FileStatus> {
        if flags.contains(git2::Status::INDEX_NEW) {
            return Some(FileStatus::Added);
        }
        if flags.contains(git2::Status::INDEX_MODIFIED) {
            return Some(FileStatus::Modified);
        }
        if flags.contains(git2::Status::INDEX_DELETED) {
            return Some(FileStatus::Deleted);
        }
        None
    }

    /// Classify the unstaged (workdir vs index) side of a status entry.
    pub fn from_unstaged_flags(flags: git2::Status) -> Option<FileStatus> {
        if flags.contains(git2::Status::WT_NEW) {
            return Some(FileStatus::Untracked);
        }
        if flags.contains(git2::Status::WT_MODIFIED) {
            return Some(FileStatus::Modified);
        }
        if flags.contains(git2::Status::WT_DELETED) {
            return Some(FileStatus::Deleted);
        }
        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Untracked => "untracked",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
