//! The tutorial session engine.
//!
//! [`TutorialEngine`] owns everything a session needs: the git backend, the
//! simulated remote, the step position and the session directories. It is a
//! synchronous single-writer: one engine per session, every mutation goes
//! through `&mut self`, and derived git state is recomputed from the
//! repository after each mutation rather than cached.
//!
//! Two entry points converge on the same execution path: typed commands go
//! through the step-aware validator first, interface actions skip it and
//! dispatch directly. Both end in the same completion check, so a step
//! finishes the same way no matter how the repository got into shape.
//!
//! # Public API
//! - [`TutorialEngine`]: The session object
//!
//! User mistakes (disallowed commands, unmet step rules, pushes of missing
//! branches) come back as unsuccessful [`CommandOutcome`]s, never as `Err`;
//! `Err` is reserved for backend and filesystem failures.

use crate::core::{
    config::{
        ALLOWED_BRANCH_NAMES, GIT_METADATA_DIR, GUI_WORK_BRANCH, REMOTE_DIR_NAME,
        WORKSPACE_DIR_NAME, WORKSPACE_PATH,
    },
    error::{Result, TutorError},
    git::GitBackend,
    parser::{CommandParser, GitVerb, ParsedCommand},
    remote::RemoteSimulator,
    state::{CommandOutcome, GitState, TutorialStage, TutorialState, ValidationResult},
    validator::{CommandRules, CommandValidator},
};
use crate::tutorial::step_validator::StepValidator;
use crate::tutorial::steps::{gui_steps, terminal_steps, StepConfig};
use chrono::DateTime;
use log::debug;
use std::path::{Path, PathBuf};

pub struct TutorialEngine {
    workspace_dir: PathBuf,
    backend: GitBackend,
    remote: RemoteSimulator,
    state: TutorialState,
    /// Index into the active stage's step sequence.
    position: usize,
}

impl TutorialEngine {
    /// Create an engine rooted at `root`. The workspace and the simulated
    /// remote live in subdirectories of it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        TutorialEngine {
            workspace_dir: root.join(WORKSPACE_DIR_NAME),
            remote: RemoteSimulator::new(root.join(REMOTE_DIR_NAME)),
            backend: GitBackend::new(),
            state: TutorialState::initial(),
            position: 0,
        }
    }

    /// Prepare the session: seed the simulated remote. The workspace is not
    /// created here; the clone step creates it.
    pub fn initialize(&mut self) -> Result<()> {
        self.remote.create_remote_repository(&self.backend)?;
        debug!("session initialized, remote at {:?}", self.remote.remote_dir());
        Ok(())
    }

    pub fn state(&self) -> &TutorialState {
        &self.state
    }

    pub fn current_step(&self) -> &StepConfig {
        &self.script()[self.position]
    }

    /// Recompute the derived repository state.
    pub fn git_state(&self) -> Result<GitState> {
        self.backend
            .get_git_state(&self.workspace_dir, self.remote.tracking())
    }

    // === Typed command path ===

    /// Execute one typed command line: step-aware validation, execution,
    /// completion check.
    pub fn execute_command(&mut self, line: &str) -> Result<CommandOutcome> {
        if self.state.is_completed {
            return Ok(CommandOutcome::rejected(
                "The tutorial is already completed",
                Some("Reset the session to start over".to_string()),
            ));
        }

        let step = *self.current_step();
        let rules = CommandRules {
            allow_branch_creation: step.allow_branch_creation,
        };
        let validation = CommandValidator::validate(line, step.allowed_verbs, &rules);
        if !validation.passed {
            debug!("command rejected at step {}: {}", step.id, validation.message);
            let mut outcome = CommandOutcome::rejected(validation.message.clone(), validation.hint.clone());
            outcome.validation = Some(validation);
            return Ok(outcome);
        }

        let parsed = CommandParser::parse(line)?;
        let outcome = self.dispatch(&parsed)?;
        self.finish(step, outcome)
    }

    // === Interface action path ===
    //
    // These bypass the step-aware command validator, so a GUI host can let
    // the user stage, commit or switch freely. They still run the same
    // dispatch and completion check as typed commands.

    pub fn stage_file(&mut self, path: &str) -> Result<CommandOutcome> {
        if let Some(rejection) = self.gui_mutation_guard()? {
            return Ok(rejection);
        }
        self.run_action(GitVerb::Add, vec![path.to_string()], None, None)
    }

    /// Remove one path from the staging area. No command verb exists for
    /// this in the tutorial language; the backend is called directly.
    pub fn unstage_file(&mut self, path: &str) -> Result<CommandOutcome> {
        if let Some(rejection) = self.gui_mutation_guard()? {
            return Ok(rejection);
        }
        let step = *self.current_step();
        self.backend.unstage(&self.workspace_dir, path)?;
        self.finish(step, CommandOutcome::ok(""))
    }

    pub fn commit(&mut self, message: &str) -> Result<CommandOutcome> {
        if let Some(rejection) = self.gui_mutation_guard()? {
            return Ok(rejection);
        }
        self.run_action(
            GitVerb::Commit,
            Vec::new(),
            Some(message.to_string()),
            None,
        )
    }

    /// Push the currently checked-out branch to the simulated remote.
    pub fn push(&mut self) -> Result<CommandOutcome> {
        if let Some(rejection) = self.gui_mutation_guard()? {
            return Ok(rejection);
        }
        let branch = self.backend.current_branch(&self.workspace_dir)?;
        self.run_action(GitVerb::Push, vec!["origin".to_string(), branch], None, None)
    }

    pub fn switch_branch(&mut self, name: &str) -> Result<CommandOutcome> {
        self.run_action(
            GitVerb::Checkout,
            vec![name.to_string()],
            None,
            Some(name.to_string()),
        )
    }

    /// Create and switch to a branch. An unsuccessful outcome (with
    /// `success == false`) signals the name is not one the tutorial works
    /// with; the repository is left untouched.
    pub fn create_branch(&mut self, name: &str) -> Result<CommandOutcome> {
        if !self.branch_name_permitted(name) {
            debug!("branch name '{name}' refused by the allow-list");
            return Ok(CommandOutcome::rejected(
                format!("The branch name '{name}' is not part of this tutorial"),
                Some(self.branch_name_hint()),
            ));
        }
        let step = *self.current_step();
        let parsed = ParsedCommand {
            verb: GitVerb::Checkout,
            args: Vec::new(),
            flags: vec!["-b".to_string()],
            message: None,
            branch_name: Some(name.to_string()),
        };
        let outcome = self.dispatch(&parsed)?;
        self.finish(step, outcome)
    }

    fn run_action(
        &mut self,
        verb: GitVerb,
        args: Vec<String>,
        message: Option<String>,
        branch_name: Option<String>,
    ) -> Result<CommandOutcome> {
        let step = *self.current_step();
        let parsed = ParsedCommand {
            verb,
            args,
            flags: Vec::new(),
            message,
            branch_name,
        };
        let outcome = self.dispatch(&parsed)?;
        self.finish(step, outcome)
    }

    /// Branch names the interface may create. The GUI curriculum creates
    /// exactly one branch; the terminal stage permits the full allow-list.
    fn branch_name_permitted(&self, name: &str) -> bool {
        match self.state.current_stage {
            TutorialStage::Terminal => ALLOWED_BRANCH_NAMES.contains(&name),
            TutorialStage::Gui => name == GUI_WORK_BRANCH,
        }
    }

    fn branch_name_hint(&self) -> String {
        match self.state.current_stage {
            TutorialStage::Terminal => {
                format!("Allowed branch names: {}", ALLOWED_BRANCH_NAMES.join(", "))
            }
            TutorialStage::Gui => format!("Name the branch {GUI_WORK_BRANCH}"),
        }
    }

    /// In the GUI stage, repository mutations are restricted to the branch
    /// the curriculum works on. Branch switching stays free so the user can
    /// get there.
    fn gui_mutation_guard(&self) -> Result<Option<CommandOutcome>> {
        if self.state.current_stage != TutorialStage::Gui {
            return Ok(None);
        }
        let branch = self.backend.current_branch(&self.workspace_dir)?;
        if branch == GUI_WORK_BRANCH {
            return Ok(None);
        }
        Ok(Some(CommandOutcome::rejected(
            format!("This action is only available on branch {GUI_WORK_BRANCH}"),
            Some(format!("Switch to {GUI_WORK_BRANCH} first")),
        )))
    }

    // === Step progression ===

    /// Advance past an instructional step. Returns false when the current
    /// step completes through repository state instead.
    pub fn next_step(&mut self) -> bool {
        if self.state.is_completed {
            return false;
        }
        if self.current_step().auto_advance {
            return false;
        }
        self.advance();
        true
    }

    /// Explicitly evaluate the current step's rules, advancing on success.
    /// This is the path for steps that only check on request.
    pub fn validate_current_step(&mut self) -> Result<ValidationResult> {
        if self.state.is_completed {
            return Ok(ValidationResult::pass("Tutorial completed"));
        }
        let step = *self.current_step();
        if step.is_instructional() {
            return Ok(ValidationResult::pass("Nothing to check for this step"));
        }
        let mut result = self.check_step(&step)?;
        if result.passed {
            result.message = step.success_message.to_string();
            if step.auto_advance {
                self.advance();
            }
        }
        Ok(result)
    }

    fn script(&self) -> &'static [StepConfig] {
        match self.state.current_stage {
            TutorialStage::Terminal => terminal_steps(),
            TutorialStage::Gui => gui_steps(),
        }
    }

    fn advance(&mut self) {
        let script = self.script();
        if self.position + 1 < script.len() {
            self.position += 1;
            self.state.current_step = script[self.position].id;
            debug!("advanced to step {}", self.state.current_step);
            return;
        }
        match self.state.current_stage {
            TutorialStage::Terminal => {
                self.state.terminal_stage_completed = true;
                self.state.current_stage = TutorialStage::Gui;
                self.position = 0;
                self.state.current_step = gui_steps()[0].id;
                debug!("terminal stage complete, entering gui stage");
            }
            TutorialStage::Gui => {
                self.state.gui_stage_completed = true;
                self.state.is_completed = true;
                debug!("tutorial complete");
            }
        }
    }

    fn check_step(&self, step: &StepConfig) -> Result<ValidationResult> {
        let state = self.git_state()?;
        Ok(StepValidator::validate_step(
            step.rules,
            &state,
            &self.workspace_dir,
        ))
    }

    /// Shared tail of every execution path: run the completion check against
    /// the freshly derived state and advance when the step allows it.
    fn finish(&mut self, step: StepConfig, mut outcome: CommandOutcome) -> Result<CommandOutcome> {
        if !outcome.success || step.is_instructional() || step.requires_validation_button {
            return Ok(outcome);
        }
        let mut result = self.check_step(&step)?;
        if result.passed {
            result.message = step.success_message.to_string();
            outcome.step_completed = true;
            outcome.validation = Some(result);
            if step.auto_advance {
                self.advance();
            }
        }
        Ok(outcome)
    }

    // === Command dispatch ===

    fn dispatch(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        // Everything except clone needs the workspace repository.
        if parsed.verb != GitVerb::Clone && !self.backend.is_repository(&self.workspace_dir) {
            return Ok(CommandOutcome::rejected(
                "fatal: not a git repository (or any of the parent directories): .git",
                Some("Clone the repository first".to_string()),
            ));
        }

        match parsed.verb {
            GitVerb::Clone => self.dispatch_clone(),
            GitVerb::Add => self.dispatch_add(parsed),
            GitVerb::Commit => self.dispatch_commit(parsed),
            GitVerb::Push => self.dispatch_push(parsed),
            GitVerb::Branch => self.dispatch_branch(parsed),
            GitVerb::Checkout => self.dispatch_checkout(parsed),
            GitVerb::Status => self.dispatch_status(),
            GitVerb::Log => self.dispatch_log(),
            GitVerb::Diff => self.dispatch_diff(parsed),
            GitVerb::Pull => Ok(CommandOutcome::ok("Already up to date.")),
            GitVerb::Init => Ok(CommandOutcome::rejected(
                "git init is not used in this tutorial",
                Some("The repository is created by cloning".to_string()),
            )),
        }
    }

    fn dispatch_clone(&mut self) -> Result<CommandOutcome> {
        if self.backend.is_repository(&self.workspace_dir) {
            return Ok(CommandOutcome::rejected(
                format!(
                    "fatal: destination path '{WORKSPACE_PATH}' already exists and is not an empty directory."
                ),
                None,
            ));
        }
        self.remote
            .clone_to_workspace(&self.backend, &self.workspace_dir)?;
        Ok(CommandOutcome::ok(format!(
            "Cloning into '{WORKSPACE_PATH}'...\nDone."
        )))
    }

    fn dispatch_add(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        for arg in &parsed.args {
            if arg == "." {
                self.backend.stage_all(&self.workspace_dir)?;
            } else if let Err(err) = self.backend.add(&self.workspace_dir, arg) {
                return Ok(CommandOutcome::rejected(
                    format!("fatal: pathspec '{arg}' did not match any files"),
                    Some(err.to_string()),
                ));
            }
        }
        // git add is silent on success
        Ok(CommandOutcome::ok(""))
    }

    fn dispatch_commit(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        let Some(message) = parsed.message.as_deref().filter(|m| !m.trim().is_empty()) else {
            return Ok(CommandOutcome::rejected(
                "Commit message cannot be empty",
                Some("Usage: git commit -m \"your message\"".to_string()),
            ));
        };

        let state = self.git_state()?;
        if state.staged_files.is_empty() {
            return Ok(CommandOutcome::rejected(
                "nothing to commit, working tree clean",
                Some("Stage changes first with git add".to_string()),
            ));
        }

        let branch = self.backend.current_branch(&self.workspace_dir)?;
        let oid = self.backend.commit(&self.workspace_dir, message)?;
        let short = &oid[..7];
        Ok(CommandOutcome::ok(format!("[{branch} {short}] {message}")))
    }

    fn dispatch_push(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        let (Some(remote_name), Some(branch)) = (parsed.args.first(), parsed.args.get(1)) else {
            return Ok(CommandOutcome::rejected(
                "git push requires remote and branch",
                Some("Usage: git push <remote> <branch>".to_string()),
            ));
        };
        if remote_name != "origin" {
            return Ok(CommandOutcome::rejected(
                format!("fatal: '{remote_name}' does not appear to be a git repository"),
                Some("The simulated remote is named origin".to_string()),
            ));
        }

        let oids = match self.backend.branch_oids(&self.workspace_dir, branch) {
            Ok(oids) => oids,
            Err(TutorError::BranchNotFound { .. }) => {
                return Ok(CommandOutcome::rejected(
                    format!("error: src refspec {branch} does not match any"),
                    Some("Create the branch before pushing it".to_string()),
                ));
            }
            Err(err) => return Err(err),
        };

        let tracking = self.remote.tracking();
        let was_tracked = tracking.is_branch_tracked(branch);
        let has_new = oids.iter().any(|oid| !tracking.is_mirrored(oid));
        if was_tracked && !has_new {
            return Ok(CommandOutcome::ok("Everything up-to-date"));
        }

        self.remote
            .simulate_push(&self.backend, &self.workspace_dir, branch)?;
        let output = if was_tracked {
            format!("To origin\n   {branch} -> {branch}")
        } else {
            format!("To origin\n * [new branch]      {branch} -> {branch}")
        };
        Ok(CommandOutcome::ok(output))
    }

    fn dispatch_branch(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        match parsed.args.first() {
            None => {
                let current = self.backend.current_branch(&self.workspace_dir)?;
                let lines: Vec<String> = self
                    .backend
                    .list_branches(&self.workspace_dir)?
                    .into_iter()
                    .map(|name| {
                        if name == current {
                            format!("* {name}")
                        } else {
                            format!("  {name}")
                        }
                    })
                    .collect();
                Ok(CommandOutcome::ok(lines.join("\n")))
            }
            Some(name) => {
                if let Err(err) = self.backend.branch(&self.workspace_dir, name, false) {
                    return Ok(CommandOutcome::rejected(err.to_string(), None));
                }
                Ok(CommandOutcome::ok(""))
            }
        }
    }

    fn dispatch_checkout(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        let Some(name) = parsed.branch_name.as_deref() else {
            return Ok(CommandOutcome::rejected(
                "git checkout requires a branch name",
                Some("Usage: git checkout <branch-name>".to_string()),
            ));
        };

        if parsed.has_flag("-b") {
            if let Err(err) = self.backend.branch(&self.workspace_dir, name, true) {
                return Ok(CommandOutcome::rejected(
                    format!("fatal: a branch named '{name}' already exists"),
                    Some(err.to_string()),
                ));
            }
            return Ok(CommandOutcome::ok(format!(
                "Switched to a new branch '{name}'"
            )));
        }

        match self.backend.checkout(&self.workspace_dir, name) {
            Ok(()) => Ok(CommandOutcome::ok(format!("Switched to branch '{name}'"))),
            Err(TutorError::BranchNotFound { .. }) => Ok(CommandOutcome::rejected(
                format!("error: pathspec '{name}' did not match any file(s) known to git"),
                Some("List existing branches with git branch".to_string()),
            )),
            Err(err) => Ok(CommandOutcome::rejected(err.to_string(), None)),
        }
    }

    fn dispatch_status(&mut self) -> Result<CommandOutcome> {
        let state = self.git_state()?;
        Ok(CommandOutcome::ok(format_status(&state)))
    }

    fn dispatch_log(&mut self) -> Result<CommandOutcome> {
        let state = self.git_state()?;
        if state.commits.is_empty() {
            return Ok(CommandOutcome::rejected(
                format!(
                    "fatal: your current branch '{}' does not have any commits yet",
                    state.current_branch
                ),
                None,
            ));
        }

        let blocks: Vec<String> = state
            .commits
            .iter()
            .map(|commit| {
                let date = DateTime::from_timestamp(commit.timestamp, 0)
                    .map(|dt| dt.format("%a %b %e %H:%M:%S %Y +0000").to_string())
                    .unwrap_or_default();
                format!(
                    "commit {}\nAuthor: {} <{}>\nDate:   {}\n\n    {}",
                    commit.oid, commit.author, commit.email, date, commit.message
                )
            })
            .collect();
        Ok(CommandOutcome::ok(blocks.join("\n\n")))
    }

    fn dispatch_diff(&mut self, parsed: &ParsedCommand) -> Result<CommandOutcome> {
        let path = parsed.args.first().map(String::as_str);
        let output = self.backend.diff(&self.workspace_dir, path)?;
        Ok(CommandOutcome::ok(output))
    }

    // === File operations ===

    /// Write a workspace file, creating parent directories, then run the
    /// completion check (the edit steps finish on a matching write).
    pub fn edit_file(&mut self, path: &str, content: &str) -> Result<CommandOutcome> {
        if !is_safe_relative_path(path) {
            return Ok(CommandOutcome::rejected(
                format!("Invalid path: {path}"),
                Some("Paths are relative to the workspace".to_string()),
            ));
        }
        let step = *self.current_step();
        let target = self.workspace_dir.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, content)?;
        self.finish(step, CommandOutcome::ok(""))
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        if !is_safe_relative_path(path) {
            return Err(TutorError::file_not_found(path));
        }
        let target = self.workspace_dir.join(path);
        if !target.is_file() {
            return Err(TutorError::file_not_found(path));
        }
        Ok(std::fs::read_to_string(target)?)
    }

    /// Every workspace file path, sorted, git metadata excluded.
    pub fn get_file_list(&self) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        if self.workspace_dir.is_dir() {
            collect_files(&self.workspace_dir, Path::new(""), &mut paths)?;
        }
        paths.sort();
        Ok(paths)
    }

    // === Session lifecycle ===

    /// Wipe the workspace and remote, clear the push record and start over
    /// from the first step.
    pub fn reset(&mut self) -> Result<()> {
        if self.workspace_dir.exists() {
            std::fs::remove_dir_all(&self.workspace_dir)?;
        }
        if self.remote.remote_dir().exists() {
            std::fs::remove_dir_all(self.remote.remote_dir())?;
        }
        self.remote.reset_tracking();
        self.state = TutorialState::initial();
        self.position = 0;
        self.initialize()
    }
}

/// Relative, no parent traversal, no absolute component.
fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let p = Path::new(path);
    !p.is_absolute()
        && p.components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

fn collect_files(dir: &Path, prefix: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == GIT_METADATA_DIR {
            continue;
        }
        let relative = prefix.join(&name);
        if entry.path().is_dir() {
            collect_files(&entry.path(), &relative, out)?;
        } else {
            let path = relative.to_str().ok_or(TutorError::InvalidUtf8Path)?;
            out.push(path.replace('\\', "/"));
        }
    }
    Ok(())
}

fn format_status(state: &GitState) -> String {
    let mut out = format!("On branch {}", state.current_branch);

    if state.has_remote
        && state.ahead_count > 0
        && state
            .remote_branches
            .iter()
            .any(|b| b == &format!("origin/{}", state.current_branch))
    {
        let n = state.ahead_count;
        let plural = if n == 1 { "commit" } else { "commits" };
        out.push_str(&format!(
            "\nYour branch is ahead of 'origin/{}' by {n} {plural}.",
            state.current_branch
        ));
    }

    let untracked: Vec<&str> = state
        .unstaged_files
        .iter()
        .filter(|f| f.status == crate::core::git_status::FileStatus::Untracked)
        .map(|f| f.path.as_str())
        .collect();
    let modified: Vec<&crate::core::state::GitFile> = state
        .unstaged_files
        .iter()
        .filter(|f| f.status != crate::core::git_status::FileStatus::Untracked)
        .collect();

    if !state.staged_files.is_empty() {
        out.push_str("\n\nChanges to be committed:");
        for file in &state.staged_files {
            out.push_str(&format!("\n  {}: {}", file.status, file.path));
        }
    }
    if !modified.is_empty() {
        out.push_str("\n\nChanges not staged for commit:");
        for file in &modified {
            out.push_str(&format!("\n  {}: {}", file.status, file.path));
        }
    }
    if !untracked.is_empty() {
        out.push_str("\n\nUntracked files:");
        for path in &untracked {
            out.push_str(&format!("\n  {path}"));
        }
    }
    if state.staged_files.is_empty() && state.unstaged_files.is_empty() {
        out.push_str("\n\nnothing to commit, working tree clean");
    }
    out
}
