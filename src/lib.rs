//! Git Tutor - an interactive, state-checked Git tutorial engine.
//!
//! This library drives a guided Git tutorial against a real local repository
//! and a simulated remote. The user works through two curricula, one typing
//! git commands and one using interface actions, and every step is completed
//! by inspecting actual repository state rather than by matching the typed
//! text.
//!
//! # Public API
//! The main entry point is [`TutorialEngine`]; supporting types are
//! re-exported from the [`core`] and [`tutorial`] modules:
//! - Command parsing and step-aware validation
//! - Git repository operations over libgit2
//! - The simulated remote and its push tracking
//! - Step definitions and repository-state completion checks

pub mod core;
pub mod tutorial;

// Re-export the public API for external users
pub use core::{
    CommandOutcome,
    CommandParser,
    CommandRules,
    CommandValidator,
    FileStatus,
    GitBackend,
    GitCommit,
    GitFile,
    // Derived and session state
    GitState,
    // Command language
    GitVerb,
    ParsedCommand,
    RemoteSimulator,
    RemoteTracking,
    // Error handling
    Result,
    TutorError,
    TutorialStage,
    TutorialState,
    ValidationResult,
};

pub use tutorial::{
    gui_steps, terminal_steps, GuiAction, StepConfig, StepValidator, TutorialEngine,
    ValidationRule,
};
