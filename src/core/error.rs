//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`TutorError`] which covers every failure mode of the
//! tutorial engine: malformed command text, git backend failures, filesystem
//! failures, and simulated-remote violations. It uses `thiserror` for
//! ergonomic error definitions.
//!
//! # Public API
//! - [`TutorError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, TutorError>`
//!
//! Input-level errors (the first group) are expected and are folded into
//! structured command outcomes by the engine; backend errors are considered
//! unexpected and are only recoverable through a session reset.

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-tutor
#[derive(Error, Debug)]
pub enum TutorError {
    // Command input errors
    #[error("Only git commands are allowed")]
    NotAGitCommand,

    #[error("Invalid git command")]
    EmptyCommand,

    #[error("Unsupported git command: {verb}")]
    UnknownVerb { verb: String },

    // Repository errors
    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("Repository has no commits yet")]
    UnbornHead,

    // File operation errors
    #[error("File does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in file content")]
    InvalidUtf8Content,

    // Simulated remote errors
    #[error("Branch {name} does not exist")]
    BranchNotFound { name: String },

    #[error("No commits to push")]
    NothingToPush,

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using TutorError
pub type Result<T> = std::result::Result<T, TutorError>;

impl TutorError {
    /// Create an unknown-verb error
    pub fn unknown_verb(verb: impl Into<String>) -> Self {
        Self::UnknownVerb { verb: verb.into() }
    }

    /// Create a not-a-repository error
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a branch not found error
    pub fn branch_not_found(name: impl Into<String>) -> Self {
        Self::BranchNotFound { name: name.into() }
    }
}
