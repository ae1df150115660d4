//! Derived and session state data structures.
//!
//! This module defines the UI-boundary data types: the derived [`GitState`]
//! projection, the mutable [`TutorialState`] session record, and the shared
//! result shapes ([`ValidationResult`], [`CommandOutcome`]) every consumer of
//! the engine receives. All of them serialize to JSON so a host UI can
//! transport them unchanged.
//!
//! # Public API
//! - [`GitState`]: Read-only projection of the workspace repository
//! - [`GitFile`] / [`GitCommit`]: Elements of the projection
//! - [`TutorialState`]: Mutable per-session progress record
//! - [`TutorialStage`]: Which curriculum (terminal or gui) is active
//! - [`ValidationResult`]: Outcome of a command or step-rule check
//! - [`CommandOutcome`]: Full result of one executed command

use crate::core::git_status::FileStatus;
use serde::{Deserialize, Serialize};

/// One file in the staged or unstaged bucket of the derived state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFile {
    pub path: String,
    pub status: FileStatus,
}

/// One commit in the derived history (most-recent-first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommit {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub email: String,
    pub timestamp: i64,
}

/// Snapshot of the workspace repository, recomputed on demand and never
/// cached across mutations.
///
/// Invariant: `staged_files` and `unstaged_files` are disjoint by path, and
/// neither contains anything under the git metadata directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitState {
    pub is_repository: bool,
    pub current_branch: String,
    pub branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub staged_files: Vec<GitFile>,
    pub unstaged_files: Vec<GitFile>,
    pub commits: Vec<GitCommit>,
    pub has_remote: bool,
    pub ahead_count: usize,
    pub behind_count: usize,
}

impl GitState {
    /// The projection of a directory that is not (yet) a repository.
    pub fn empty() -> Self {
        GitState {
            is_repository: false,
            current_branch: String::new(),
            branches: Vec::new(),
            remote_branches: Vec::new(),
            staged_files: Vec::new(),
            unstaged_files: Vec::new(),
            commits: Vec::new(),
            has_remote: false,
            ahead_count: 0,
            behind_count: 0,
        }
    }

    pub fn is_file_staged(&self, path: &str) -> bool {
        self.staged_files.iter().any(|f| f.path == path)
    }
}

/// Which curriculum the session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorialStage {
    Terminal,
    Gui,
}

/// Mutable session progress, owned exclusively by the tutorial engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialState {
    pub current_step: u32,
    pub current_stage: TutorialStage,
    pub is_completed: bool,
    pub terminal_stage_completed: bool,
    pub gui_stage_completed: bool,
}

impl TutorialState {
    pub fn initial() -> Self {
        TutorialState {
            current_step: 0,
            current_stage: TutorialStage::Terminal,
            is_completed: false,
            terminal_stage_completed: false,
            gui_stage_completed: false,
        }
    }
}

impl Default for TutorialState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Outcome of a command-permission check or a step-rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl ValidationResult {
    pub fn pass(message: impl Into<String>) -> Self {
        ValidationResult {
            passed: true,
            message: message.into(),
            hint: None,
        }
    }

    pub fn fail(message: impl Into<String>, hint: impl Into<String>) -> Self {
        ValidationResult {
            passed: false,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// Full result of one executed command or GUI action.
///
/// Input errors and unmet step rules are reported through this structure
/// rather than as `Err` values; the session never crashes on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub hint: Option<String>,
    pub step_completed: bool,
    pub validation: Option<ValidationResult>,
}

impl CommandOutcome {
    pub fn ok(output: impl Into<String>) -> Self {
        CommandOutcome {
            success: true,
            output: output.into(),
            error: None,
            hint: None,
            step_completed: false,
            validation: None,
        }
    }

    pub fn rejected(error: impl Into<String>, hint: Option<String>) -> Self {
        CommandOutcome {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            hint,
            step_completed: false,
            validation: None,
        }
    }
}
