//! End-to-end tests for the terminal curriculum: typed commands drive the
//! session from the welcome step to the terminal/GUI handover.

mod common;

use anyhow::Result;
use common::{setup_session, TestSession};
use git_tutor::core::TutorialStage;

/// Clone and branch, leaving the session on the edit step (id 5).
fn session_at_edit_step() -> Result<TestSession> {
    let mut session = setup_session()?;
    session.engine.next_step(); // 0 -> 1
    session.run("git clone /remote-repo")?;
    session.engine.next_step(); // 2 -> 3
    session.run("git checkout -b feature/add-greeting")?;
    session.engine.next_step(); // 4 -> 5
    Ok(session)
}

/// Drive through the edit and add steps as well, onto the commit step (id 9).
fn session_at_commit_step() -> Result<TestSession> {
    let mut session = session_at_edit_step()?;
    session.engine.edit_file("greeting.txt", "Hello, Git!\n")?;
    session.engine.validate_current_step()?;
    session.engine.next_step(); // 6 -> 7
    session.run("git add greeting.txt")?;
    session.engine.next_step(); // 8 -> 9
    Ok(session)
}

#[test]
fn test_full_terminal_walkthrough() -> Result<()> {
    let mut session = setup_session()?;
    session.complete_terminal_stage()?;

    let state = session.engine.state();
    assert!(state.terminal_stage_completed);
    assert!(!state.is_completed);
    assert_eq!(state.current_stage, TutorialStage::Gui);
    assert_eq!(state.current_step, 20);
    Ok(())
}

#[test]
fn test_welcome_step_gates_all_commands() -> Result<()> {
    let mut session = setup_session()?;
    let outcome = session.engine.execute_command("git status")?;
    assert!(!outcome.success);
    assert!(outcome
        .error
        .as_deref()
        .unwrap_or("")
        .contains("not allowed at this step"));
    Ok(())
}

#[test]
fn test_non_git_input_is_rejected_with_hint() -> Result<()> {
    let mut session = setup_session()?;
    session.engine.next_step();

    let outcome = session.engine.execute_command("ls -la")?;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Only git commands are allowed"));
    assert!(outcome.hint.is_some());
    Ok(())
}

#[test]
fn test_clone_advances_and_seeds_workspace() -> Result<()> {
    let mut session = setup_session()?;
    session.engine.next_step();

    let outcome = session.engine.execute_command("git clone /remote-repo")?;
    assert!(outcome.success);
    assert!(outcome.step_completed);
    assert_eq!(outcome.output, "Cloning into '/workspace'...\nDone.");

    assert!(session.workspace_dir().join("README.md").exists());
    let git = session.engine.git_state()?;
    assert!(git.is_repository);
    assert_eq!(git.current_branch, "main");
    assert_eq!(git.commits.len(), 1);
    assert_eq!(git.ahead_count, 0);
    Ok(())
}

#[test]
fn test_clone_of_wrong_path_is_rejected() -> Result<()> {
    let mut session = setup_session()?;
    session.engine.next_step();

    let outcome = session
        .engine
        .execute_command("git clone https://example.com/repo.git")?;
    assert!(!outcome.success);
    assert!(outcome.error.as_deref().unwrap_or("").contains("not found"));
    assert_eq!(session.engine.state().current_step, 1);
    Ok(())
}

#[test]
fn test_branch_step_directly_follows_clone() -> Result<()> {
    let mut session = setup_session()?;
    session.engine.next_step();
    session.run("git clone /remote-repo")?;
    session.engine.next_step();
    assert_eq!(session.engine.state().current_step, 3);

    let outcome = session
        .engine
        .execute_command("git checkout -b feature/add-greeting")?;
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(outcome.output, "Switched to a new branch 'feature/add-greeting'");
    assert!(outcome.step_completed);
    assert_eq!(session.engine.state().current_step, 4);

    // The branch forked from the pristine clone.
    let git = session.engine.git_state()?;
    assert_eq!(git.current_branch, "feature/add-greeting");
    assert_eq!(git.commits.len(), 1);
    Ok(())
}

#[test]
fn test_branch_step_rejects_names_off_the_list() -> Result<()> {
    let mut session = setup_session()?;
    session.engine.next_step();
    session.run("git clone /remote-repo")?;
    session.engine.next_step();

    let outcome = session
        .engine
        .execute_command("git checkout -b feature/whatever")?;
    assert!(!outcome.success);
    assert!(outcome
        .error
        .as_deref()
        .unwrap_or("")
        .contains("not allowed in this tutorial"));
    assert_eq!(session.engine.state().current_step, 3);
    Ok(())
}

#[test]
fn test_edit_step_waits_for_explicit_check() -> Result<()> {
    let mut session = session_at_edit_step()?;
    assert_eq!(session.engine.state().current_step, 5);

    // The matching edit alone does not complete the step.
    let outcome = session.engine.edit_file("greeting.txt", "Hello, Git!\n")?;
    assert!(outcome.success);
    assert!(!outcome.step_completed);
    assert_eq!(session.engine.state().current_step, 5);

    let check = session.engine.validate_current_step()?;
    assert!(check.passed, "{}", check.message);
    assert_eq!(session.engine.state().current_step, 6);
    Ok(())
}

#[test]
fn test_edit_check_fails_on_wrong_content() -> Result<()> {
    let mut session = session_at_edit_step()?;

    session.engine.edit_file("greeting.txt", "Goodbye\n")?;
    let check = session.engine.validate_current_step()?;
    assert!(!check.passed);
    assert!(check.hint.is_some());
    assert_eq!(session.engine.state().current_step, 5);
    Ok(())
}

#[test]
fn test_add_step_advances_without_explicit_check() -> Result<()> {
    let mut session = session_at_edit_step()?;
    session.engine.edit_file("greeting.txt", "Hello, Git!\n")?;
    session.engine.validate_current_step()?;
    session.engine.next_step(); // 6 -> 7
    assert_eq!(session.engine.state().current_step, 7);

    let outcome = session.engine.execute_command("git add greeting.txt")?;
    assert!(outcome.success);
    assert!(outcome.step_completed);
    assert_eq!(session.engine.state().current_step, 8);
    Ok(())
}

#[test]
fn test_check_fails_before_staging() -> Result<()> {
    let mut session = session_at_edit_step()?;
    session.engine.edit_file("greeting.txt", "Hello, Git!\n")?;
    session.engine.validate_current_step()?;
    session.engine.next_step(); // 6 -> 7

    let check = session.engine.validate_current_step()?;
    assert!(!check.passed);
    assert!(check.message.contains("not staged"));
    assert_eq!(session.engine.state().current_step, 7);
    Ok(())
}

#[test]
fn test_commit_output_and_ahead_count() -> Result<()> {
    let mut session = session_at_commit_step()?;

    let outcome = session
        .engine
        .execute_command("git commit -m \"Add greeting message\"")?;
    assert!(outcome.success);
    assert!(outcome.output.starts_with("[feature/add-greeting "));
    assert!(outcome.output.ends_with("] Add greeting message"));
    assert!(outcome.step_completed);

    let git = session.engine.git_state()?;
    assert_eq!(git.commits.len(), 2);
    assert_eq!(git.commits[0].message, "Add greeting message");
    assert_eq!(git.ahead_count, 1);
    Ok(())
}

#[test]
fn test_commit_without_staged_changes_is_rejected() -> Result<()> {
    let mut session = session_at_commit_step()?;
    session.run("git commit -m \"Add greeting message\"")?;

    // Nothing staged anymore; the interface commit joins the same path.
    let outcome = session.engine.commit("again")?;
    assert!(!outcome.success);
    assert!(outcome
        .error
        .as_deref()
        .unwrap_or("")
        .contains("nothing to commit"));
    Ok(())
}

#[test]
fn test_push_clears_ahead_count_and_completes_step() -> Result<()> {
    let mut session = session_at_commit_step()?;
    session.run("git commit -m \"Add greeting message\"")?;
    session.engine.next_step(); // 10 -> 11
    assert_eq!(session.engine.state().current_step, 11);

    assert_eq!(session.engine.git_state()?.ahead_count, 1);

    let outcome = session
        .engine
        .execute_command("git push origin feature/add-greeting")?;
    assert!(outcome.success);
    assert_eq!(
        outcome.output,
        "To origin\n * [new branch]      feature/add-greeting -> feature/add-greeting"
    );
    assert!(outcome.step_completed);

    let git = session.engine.git_state()?;
    assert_eq!(git.ahead_count, 0);
    assert!(git
        .remote_branches
        .contains(&"origin/feature/add-greeting".to_string()));
    Ok(())
}

#[test]
fn test_status_reports_ahead_of_remote() -> Result<()> {
    let mut session = session_at_commit_step()?;
    session.run("git commit -m \"Add greeting message\"")?;
    session.engine.next_step(); // 10 -> 11
    session.run("git push origin feature/add-greeting")?;
    assert_eq!(session.engine.state().current_step, 12);

    // A fresh commit on the now-tracked branch shows up as unpushed.
    session.engine.edit_file("README.md", "# Sample Project\n\nupdated\n")?;
    session.engine.stage_file("README.md")?;
    session.engine.commit("Update readme")?;

    let outcome = session.engine.execute_command("git status")?;
    assert!(outcome
        .output
        .contains("Your branch is ahead of 'origin/feature/add-greeting' by 1 commit."));
    Ok(())
}

#[test]
fn test_diff_shows_pending_edit() -> Result<()> {
    let mut session = session_at_edit_step()?;
    session.engine.edit_file("greeting.txt", "Hello, Git!\n")?;

    // The edit step allows read-only commands while the user works.
    let outcome = session.engine.execute_command("git diff greeting.txt")?;
    assert!(outcome.output.contains("diff --git a/greeting.txt b/greeting.txt"));
    assert!(outcome.output.contains("+Hello, Git!"));
    Ok(())
}

#[test]
fn test_log_lists_history_newest_first() -> Result<()> {
    let mut session = setup_session()?;
    session.complete_terminal_stage()?;

    // The first GUI step allows read-only commands.
    let outcome = session.engine.execute_command("git log")?;
    let add_pos = outcome.output.find("Add greeting message");
    let initial_pos = outcome.output.find("Initial commit");
    assert!(add_pos.is_some() && initial_pos.is_some());
    assert!(add_pos < initial_pos);
    assert!(outcome.output.contains("Author: Git Tutor User <user@git-tutor.local>"));
    Ok(())
}
