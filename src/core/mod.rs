//! Core functionality for the git-tutor engine.
//!
//! This module provides the fundamental building blocks: command parsing and
//! validation, the git backend, the simulated remote, derived state types,
//! error handling, and output formatting.

pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod git_status;
pub mod output;
pub mod parser;
pub mod remote;
pub mod state;
pub mod validator;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{Result, TutorError};

// === Command parsing ===
// Quote-aware tokenizer and the structured command representation
pub use parser::{CommandParser, GitVerb, ParsedCommand};

// === Command validation ===
// Step-aware permission and structure checks for typed commands
pub use validator::{CommandRules, CommandValidator};

// === Git operations ===
// Repository backend and type-safe status classification
pub use git::GitBackend;
pub use git_status::FileStatus;

// === Remote simulation ===
// Local stand-in for a network remote plus its push tracking record
pub use remote::{RemoteSimulator, RemoteTracking};

// === State types ===
// Derived repository projection and session result shapes
pub use state::{
    CommandOutcome, GitCommit, GitFile, GitState, TutorialStage, TutorialState, ValidationResult,
};

// === Output formatting ===
// Unified output formatting for the interactive session
pub use output::{print_error, print_hint, print_info, print_outcome, print_step_header, print_success};
