//! Tutorial session setup utilities
//!
//! Provides helpers for creating initialized tutorial sessions in temporary
//! directories, plus shortcuts for driving the session to well-known points
//! of the curriculum.

#![allow(dead_code)]

use anyhow::Result;
use git_tutor::tutorial::TutorialEngine;
use std::path::PathBuf;
use tempfile::TempDir;

/// An initialized tutorial session rooted in a temporary directory.
/// The TempDir must be kept alive for the duration of the test to prevent
/// cleanup.
pub struct TestSession {
    pub temp_dir: TempDir,
    pub engine: TutorialEngine,
}

impl TestSession {
    pub fn workspace_dir(&self) -> PathBuf {
        self.temp_dir.path().join("workspace")
    }

    /// Run one command, asserting it succeeded.
    pub fn run(&mut self, line: &str) -> Result<()> {
        let outcome = self.engine.execute_command(line)?;
        anyhow::ensure!(
            outcome.success,
            "command failed: {line}: {:?}",
            outcome.error
        );
        Ok(())
    }

    /// Drive the terminal curriculum from the welcome step to its end,
    /// leaving the session at the first GUI step.
    pub fn complete_terminal_stage(&mut self) -> Result<()> {
        self.engine.next_step(); // 0 -> 1
        self.run("git clone /remote-repo")?;
        self.engine.next_step(); // 2 -> 3
        self.run("git checkout -b feature/add-greeting")?;
        self.engine.next_step(); // 4 -> 5
        self.engine.edit_file("greeting.txt", "Hello, Git!\n")?;
        let check = self.engine.validate_current_step()?;
        anyhow::ensure!(check.passed, "edit step did not pass: {}", check.message);
        self.engine.next_step(); // 6 -> 7
        self.run("git add greeting.txt")?;
        self.engine.next_step(); // 8 -> 9
        self.run("git commit -m \"Add greeting message\"")?;
        self.engine.next_step(); // 10 -> 11
        self.run("git push origin feature/add-greeting")?;
        self.engine.next_step(); // 12 -> gui 20
        Ok(())
    }
}

/// Sets up a fresh, initialized tutorial session for testing.
pub fn setup_session() -> Result<TestSession> {
    let temp_dir = TempDir::new()?;
    let mut engine = TutorialEngine::new(temp_dir.path());
    engine.initialize()?;
    Ok(TestSession { temp_dir, engine })
}
