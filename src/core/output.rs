//! Unified output formatting utilities for the interactive session.
//!
//! This module provides standardized formatting functions for all git-tutor
//! output, ensuring consistent colors, spacing, and message structure across
//! the REPL.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, yellow for hints, green for
//!   progress, cyan for step headers
//! - **Standardized spacing**: Newline before step headers and after errors
//! - **Plain command output**: Simulated git output is printed uncolored, the
//!   way a real terminal would show it

use crate::core::state::CommandOutcome;
use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a hint in muted yellow
pub fn print_hint(hint: &str) {
    println!("{} {}", "Hint:".yellow(), hint.bright_black());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints the current step banner: number, title, instruction.
///
/// # Format
/// ```text
///
/// ── Step <id>: <title> ──
/// <instruction>
///
/// ```
pub fn print_step_header(id: u32, title: &str, instruction: &str) {
    println!("\n{}", format!("── Step {id}: {title} ──").cyan().bold());
    println!("{}\n", instruction.white());
}

/// Prints the full outcome of one executed command: simulated git output,
/// error and hint when present, and a completion banner when the command
/// finished the step.
pub fn print_outcome(outcome: &CommandOutcome) {
    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    if let Some(error) = &outcome.error {
        print_error(error);
    }
    if let Some(hint) = &outcome.hint {
        print_hint(hint);
    }
    if outcome.step_completed {
        print_success("Step completed!");
    }
}
