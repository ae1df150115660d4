//! Fixed tutorial constants: virtual paths, branch allow-list, seed content.
//!
//! The tutorial script exercises a small, fixed set of file and branch names.
//! Everything that must match between the command validator, the step tables
//! and the remote simulator lives here so the three can never drift apart.

/// Virtual path the user types as the clone source (`git clone /remote-repo`).
pub const REMOTE_PATH: &str = "/remote-repo";

/// Virtual path of the workspace, used in command output.
pub const WORKSPACE_PATH: &str = "/workspace";

/// Directory name of the simulated remote under the session root.
pub const REMOTE_DIR_NAME: &str = "remote-repo";

/// Directory name of the workspace under the session root.
pub const WORKSPACE_DIR_NAME: &str = "workspace";

/// Git metadata directory, excluded from every file listing and status scan.
pub const GIT_METADATA_DIR: &str = ".git";

/// Branch names the tutorial permits creating or switching to.
pub const ALLOWED_BRANCH_NAMES: &[&str] = &["main", "feature/add-greeting", "feature/gui-test"];

/// The only branch GUI-stage mutations (stage/commit/push) may run on.
pub const GUI_WORK_BRANCH: &str = "feature/gui-test";

/// Commit author identity used for every simulated commit.
pub const AUTHOR_NAME: &str = "Git Tutor User";
pub const AUTHOR_EMAIL: &str = "user@git-tutor.local";

/// History depth for `git log` output and the derived commit list.
pub const LOG_DEPTH: usize = 10;

/// File set the remote repository is seeded with.
pub const INITIAL_FILES: &[(&str, &str)] = &[
    (
        "README.md",
        "# Sample Project\n\nThis is a sample project for learning Git.\n\n## Getting Started\n\nEdit the files and commit your changes!\n",
    ),
    ("greeting.txt", ""),
    ("src/main.js", "console.log('Hello, World!');\n"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_files_cover_tutorial_targets() {
        let paths: Vec<&str> = INITIAL_FILES.iter().map(|(p, _)| *p).collect();
        assert!(paths.contains(&"README.md"));
        assert!(paths.contains(&"greeting.txt"));
    }

    #[test]
    fn gui_work_branch_is_allow_listed() {
        assert!(ALLOWED_BRANCH_NAMES.contains(&GUI_WORK_BRANCH));
    }
}
