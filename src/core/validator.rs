//! Step-aware command permission checks.
//!
//! Given the current step's verb allow-list and options, [`CommandValidator`]
//! decides whether a typed command is permitted and structurally well-formed
//! at this point of the tutorial. It is deliberately independent of actual
//! repository state: a command that passes here can still fail in the
//! backend (e.g. checking out a branch that does not exist yet).
//!
//! Every rejection carries a corrective hint showing correct usage.

use crate::core::config::{ALLOWED_BRANCH_NAMES, REMOTE_PATH};
use crate::core::error::TutorError;
use crate::core::parser::{CommandParser, GitVerb, ParsedCommand};
use crate::core::state::ValidationResult;

/// Per-step validation options beyond the verb allow-list.
#[derive(Debug, Clone, Copy)]
pub struct CommandRules {
    /// Whether `git branch <name>` / `git checkout -b <name>` may create a
    /// branch at this step. Listing (`git branch` with no args) is always
    /// permitted when the verb itself is.
    pub allow_branch_creation: bool,
}

impl Default for CommandRules {
    fn default() -> Self {
        CommandRules {
            allow_branch_creation: true,
        }
    }
}

/// Stateless validator for typed commands.
pub struct CommandValidator;

impl CommandValidator {
    /// Validate one command line against the current step's allow-list.
    pub fn validate(line: &str, allowed: &[GitVerb], rules: &CommandRules) -> ValidationResult {
        if !CommandParser::is_git_command(line) {
            return ValidationResult::fail(
                "Only git commands are allowed",
                "Start your command with \"git\"",
            );
        }

        let parsed = match CommandParser::parse(line) {
            Ok(parsed) => parsed,
            Err(TutorError::UnknownVerb { verb }) => {
                return ValidationResult::fail(
                    format!("Unsupported git command: {verb}"),
                    "Check your command syntax",
                );
            }
            Err(err) => {
                return ValidationResult::fail(err.to_string(), "Check your command syntax");
            }
        };

        if !allowed.contains(&parsed.verb) {
            let listing = allowed
                .iter()
                .map(|verb| format!("git {verb}"))
                .collect::<Vec<_>>()
                .join(", ");
            return ValidationResult::fail(
                format!(
                    "The command \"git {}\" is not allowed at this step",
                    parsed.verb
                ),
                format!("Allowed commands: {listing}"),
            );
        }

        let structural = Self::validate_verb(&parsed, rules);
        if !structural.passed {
            return structural;
        }

        ValidationResult::pass("Command is valid")
    }

    fn validate_verb(parsed: &ParsedCommand, rules: &CommandRules) -> ValidationResult {
        match parsed.verb {
            GitVerb::Clone => Self::validate_clone(parsed),
            GitVerb::Commit => Self::validate_commit(parsed),
            GitVerb::Add => Self::validate_add(parsed),
            GitVerb::Checkout => Self::validate_checkout(parsed),
            GitVerb::Branch => Self::validate_branch(parsed, rules),
            GitVerb::Push => Self::validate_push(parsed),
            // Read-only verbs have no structural requirements; init/pull are
            // never on a step allow-list and get rejected above.
            GitVerb::Init
            | GitVerb::Pull
            | GitVerb::Status
            | GitVerb::Log
            | GitVerb::Diff => ValidationResult::pass("Valid command"),
        }
    }

    fn validate_clone(parsed: &ParsedCommand) -> ValidationResult {
        if parsed.args.len() != 1 {
            return ValidationResult::fail(
                "git clone requires a repository path",
                "Usage: git clone <repository>",
            );
        }
        if parsed.args[0] != REMOTE_PATH {
            return ValidationResult::fail(
                format!("Repository not found: {}", parsed.args[0]),
                format!("In this tutorial, clone the simulated remote: git clone {REMOTE_PATH}"),
            );
        }
        ValidationResult::pass("Valid command")
    }

    fn validate_commit(parsed: &ParsedCommand) -> ValidationResult {
        if !parsed.has_flag("-m") {
            return ValidationResult::fail(
                "git commit requires a message",
                "Usage: git commit -m \"your message\"",
            );
        }
        match parsed.message.as_deref() {
            Some(message) if !message.trim().is_empty() => {
                ValidationResult::pass("Valid command")
            }
            _ => ValidationResult::fail(
                "Commit message cannot be empty",
                "Provide a commit message after the -m flag",
            ),
        }
    }

    fn validate_add(parsed: &ParsedCommand) -> ValidationResult {
        if parsed.args.is_empty() {
            return ValidationResult::fail(
                "git add requires a file path",
                "Usage: git add <file> or git add .",
            );
        }
        ValidationResult::pass("Valid command")
    }

    fn validate_checkout(parsed: &ParsedCommand) -> ValidationResult {
        if parsed.has_flag("-b") && parsed.branch_name.is_none() {
            return ValidationResult::fail(
                "git checkout -b requires a branch name",
                "Usage: git checkout -b <branch-name>",
            );
        }
        if !parsed.has_flag("-b") && parsed.args.is_empty() {
            return ValidationResult::fail(
                "git checkout requires a branch name",
                "Usage: git checkout <branch-name>",
            );
        }
        match parsed.branch_name.as_deref() {
            Some(name) if ALLOWED_BRANCH_NAMES.contains(&name) => {
                ValidationResult::pass("Valid command")
            }
            Some(name) => ValidationResult::fail(
                format!("Branch '{name}' is not allowed in this tutorial"),
                Self::allowed_branches_hint(),
            ),
            None => ValidationResult::fail(
                "git checkout requires a branch name",
                "Usage: git checkout <branch-name>",
            ),
        }
    }

    fn validate_branch(parsed: &ParsedCommand, rules: &CommandRules) -> ValidationResult {
        if let Some(flag) = parsed.flags.first() {
            return ValidationResult::fail(
                format!("Unsupported flag: {flag}"),
                "Usage: git branch [<branch-name>]",
            );
        }
        if parsed.args.is_empty() {
            // Listing branches is always fine.
            return ValidationResult::pass("Valid command");
        }
        if !rules.allow_branch_creation {
            return ValidationResult::fail(
                "Creating a branch is not allowed at this step",
                "Use git branch without arguments to list branches",
            );
        }
        if parsed.args.len() > 1 {
            return ValidationResult::fail(
                "git branch takes at most one branch name",
                "Usage: git branch <branch-name>",
            );
        }
        let name = parsed.args[0].as_str();
        if !ALLOWED_BRANCH_NAMES.contains(&name) {
            return ValidationResult::fail(
                format!("Branch '{name}' is not allowed in this tutorial"),
                Self::allowed_branches_hint(),
            );
        }
        ValidationResult::pass("Valid command")
    }

    fn validate_push(parsed: &ParsedCommand) -> ValidationResult {
        if parsed.args.len() < 2 {
            return ValidationResult::fail(
                "git push requires remote and branch",
                "Usage: git push <remote> <branch>",
            );
        }
        ValidationResult::pass("Valid command")
    }

    fn allowed_branches_hint() -> String {
        format!("Allowed branch names: {}", ALLOWED_BRANCH_NAMES.join(", "))
    }
}
