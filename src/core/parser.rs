//! Tutorial command-line parsing.
//!
//! This module turns a typed line like `git commit -m "Add greeting"` into a
//! structured [`ParsedCommand`]. Parsing is purely lexical: it never looks at
//! repository state, and it never decides whether a command is *permitted* at
//! the current tutorial step (that is the validator's job).
//!
//! # Public API
//! - [`GitVerb`]: Exhaustive enum over the supported git subcommands
//! - [`ParsedCommand`]: Verb, positional args, flags and derived fields
//! - [`CommandParser`]: The parser itself (stateless)
//!
//! # Grammar
//! - Input must start with the literal prefix `git ` after trimming.
//! - Tokens split on whitespace; `"..."` and `'...'` spans group into a
//!   single token with the quotes stripped.
//! - Tokens starting with `-` are flags. `-m` consumes the following token
//!   as the commit message, `-b` consumes it as the branch name; consumed
//!   tokens do not appear in the positional args.
//! - For `checkout` without `-b`, the first positional arg doubles as the
//!   branch name.

use crate::core::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Git subcommands the tutorial language understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitVerb {
    Clone,
    Init,
    Add,
    Commit,
    Push,
    Pull,
    Branch,
    Checkout,
    Status,
    Log,
    Diff,
}

impl GitVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitVerb::Clone => "clone",
            GitVerb::Init => "init",
            GitVerb::Add => "add",
            GitVerb::Commit => "commit",
            GitVerb::Push => "push",
            GitVerb::Pull => "pull",
            GitVerb::Branch => "branch",
            GitVerb::Checkout => "checkout",
            GitVerb::Status => "status",
            GitVerb::Log => "log",
            GitVerb::Diff => "diff",
        }
    }
}

impl fmt::Display for GitVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GitVerb {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "clone" => Ok(GitVerb::Clone),
            "init" => Ok(GitVerb::Init),
            "add" => Ok(GitVerb::Add),
            "commit" => Ok(GitVerb::Commit),
            "push" => Ok(GitVerb::Push),
            "pull" => Ok(GitVerb::Pull),
            "branch" => Ok(GitVerb::Branch),
            "checkout" => Ok(GitVerb::Checkout),
            "status" => Ok(GitVerb::Status),
            "log" => Ok(GitVerb::Log),
            "diff" => Ok(GitVerb::Diff),
            other => Err(TutorError::unknown_verb(other)),
        }
    }
}

/// Structured form of one typed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub verb: GitVerb,
    pub args: Vec<String>,
    pub flags: Vec<String>,
    pub message: Option<String>,
    pub branch_name: Option<String>,
}

impl ParsedCommand {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Stateless command-line parser for the tutorial command language.
pub struct CommandParser;

impl CommandParser {
    /// Check whether the line is addressed to git at all.
    pub fn is_git_command(line: &str) -> bool {
        line.trim().starts_with("git ")
    }

    /// Parse a command line into a [`ParsedCommand`].
    ///
    /// Pure function of the input text; no repository access, no
    /// tutorial-step knowledge.
    pub fn parse(line: &str) -> Result<ParsedCommand> {
        let trimmed = line.trim();

        if !Self::is_git_command(trimmed) {
            return Err(TutorError::NotAGitCommand);
        }

        let rest = trimmed["git ".len()..].trim();
        let tokens = Self::tokenize(rest);

        let Some((verb_token, tail)) = tokens.split_first() else {
            return Err(TutorError::EmptyCommand);
        };
        let verb = verb_token.parse::<GitVerb>()?;

        let mut args = Vec::new();
        let mut flags = Vec::new();
        let mut message = None;
        let mut branch_name = None;

        let mut iter = tail.iter().peekable();
        while let Some(token) = iter.next() {
            if token.starts_with('-') {
                flags.push(token.clone());
                // -m and -b consume the following token
                if token == "-m" {
                    if let Some(next) = iter.peek() {
                        message = Some((*next).clone());
                        iter.next();
                    }
                } else if token == "-b" {
                    if let Some(next) = iter.peek() {
                        branch_name = Some((*next).clone());
                        iter.next();
                    }
                }
            } else {
                args.push(token.clone());
            }
        }

        // Plain `git checkout <branch>` carries the branch positionally.
        if verb == GitVerb::Checkout && branch_name.is_none() {
            branch_name = args.first().cloned();
        }

        Ok(ParsedCommand {
            verb,
            args,
            flags,
            message,
            branch_name,
        })
    }

    /// Split on whitespace, keeping quoted spans (single or double) as one
    /// token with the quotes stripped.
    fn tokenize(input: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;

        for ch in input.chars() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => current.push(ch),
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                None if ch.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                None => current.push(ch),
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }
}
