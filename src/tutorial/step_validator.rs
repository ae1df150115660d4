//! Repository-state completion checks for tutorial steps.
//!
//! [`StepValidator`] evaluates a step's [`ValidationRule`] list against the
//! derived [`GitState`] and the working tree. Rules run in order and the
//! first failing rule short-circuits, so the user always sees the earliest
//! unmet requirement with a hint for exactly that one.
//!
//! Checks read the freshly derived state rather than command side effects:
//! a step counts as complete because the repository looks right, not because
//! a particular command ran.

use crate::core::state::{GitState, ValidationResult};
use crate::tutorial::steps::ValidationRule;
use std::path::Path;

pub struct StepValidator;

impl StepValidator {
    /// Evaluate the rules in order; the first failure wins.
    pub fn validate_step(
        rules: &[ValidationRule],
        state: &GitState,
        workspace_dir: &Path,
    ) -> ValidationResult {
        for rule in rules {
            let result = Self::check_rule(rule, state, workspace_dir);
            if !result.passed {
                return result;
            }
        }
        ValidationResult::pass("Step requirements met")
    }

    fn check_rule(
        rule: &ValidationRule,
        state: &GitState,
        workspace_dir: &Path,
    ) -> ValidationResult {
        match rule {
            ValidationRule::FileExists { path } => {
                if workspace_dir.join(path).exists() {
                    ValidationResult::pass(format!("{path} exists"))
                } else {
                    ValidationResult::fail(
                        format!("{path} does not exist yet"),
                        "Clone the repository to get the project files",
                    )
                }
            }
            ValidationRule::FileContent { path, contains } => {
                match std::fs::read_to_string(workspace_dir.join(path)) {
                    Ok(content) if content.contains(contains) => {
                        ValidationResult::pass(format!("{path} has the expected content"))
                    }
                    Ok(_) => ValidationResult::fail(
                        format!("{path} does not contain the expected text yet"),
                        format!("Make {path} contain: {contains}"),
                    ),
                    Err(_) => ValidationResult::fail(
                        format!("{path} does not exist yet"),
                        format!("Create {path} and make it contain: {contains}"),
                    ),
                }
            }
            ValidationRule::FileStaged { path } => {
                if state.is_file_staged(path) {
                    ValidationResult::pass(format!("{path} is staged"))
                } else {
                    ValidationResult::fail(
                        format!("{path} is not staged yet"),
                        format!("Stage it with: git add {path}"),
                    )
                }
            }
            ValidationRule::BranchCreated { name } => {
                if state.branches.iter().any(|b| b == name) {
                    ValidationResult::pass(format!("Branch {name} exists"))
                } else {
                    ValidationResult::fail(
                        format!("Branch {name} has not been created yet"),
                        format!("Create it with: git checkout -b {name}"),
                    )
                }
            }
            ValidationRule::BranchSwitched { name } => {
                if state.current_branch == *name {
                    ValidationResult::pass(format!("On branch {name}"))
                } else {
                    ValidationResult::fail(
                        format!("You are not on branch {name}"),
                        format!("Switch with: git checkout {name}"),
                    )
                }
            }
            ValidationRule::CommitMade { min_count } => {
                if state.commits.len() >= *min_count {
                    ValidationResult::pass("Commit recorded")
                } else {
                    ValidationResult::fail(
                        "The commit has not been made yet",
                        "Commit your staged changes with: git commit -m \"your message\"",
                    )
                }
            }
            ValidationRule::Pushed { branch } => {
                let tracked = state
                    .remote_branches
                    .iter()
                    .any(|b| b == &format!("origin/{branch}"));
                if tracked && state.ahead_count == 0 {
                    ValidationResult::pass(format!("{branch} is pushed"))
                } else {
                    ValidationResult::fail(
                        format!("{branch} has not been pushed yet"),
                        format!("Publish it with: git push origin {branch}"),
                    )
                }
            }
        }
    }
}
