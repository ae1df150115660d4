//! Tutorial step definitions for both curricula.
//!
//! Steps come in two fixed sequences: the terminal curriculum (ids 0 to 12),
//! where the user types git commands, and the GUI curriculum (ids 20 to 61),
//! where the user drives the same operations through interface actions.
//! In the terminal sequence each action step is followed by a confirmation
//! step; confirmation steps never auto-advance and wait for an explicit
//! "next". The edit step checks completion only when the user presses its
//! validation button.
//!
//! # Public API
//! - [`StepConfig`]: One step: text, allowed commands, completion rules
//! - [`ValidationRule`]: A single repository-state completion check
//! - [`GuiAction`]: Interface actions an action step permits
//! - [`terminal_steps`] / [`gui_steps`]: The two sequences

use crate::core::config::GUI_WORK_BRANCH;
use crate::core::parser::GitVerb;
use crate::core::state::TutorialStage;
use serde::Serialize;

/// One repository-state check a step must satisfy to count as complete.
/// A step's rules are evaluated in order and combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// The path exists in the working tree.
    FileExists { path: &'static str },
    /// The working-tree file contains the given substring.
    FileContent {
        path: &'static str,
        contains: &'static str,
    },
    /// The path is in the staged bucket of the derived state.
    FileStaged { path: &'static str },
    /// The local branch exists.
    BranchCreated { name: &'static str },
    /// The branch is currently checked out.
    BranchSwitched { name: &'static str },
    /// HEAD history holds at least this many commits.
    CommitMade { min_count: usize },
    /// The branch has been pushed and carries no unpushed commits.
    Pushed { branch: &'static str },
}

/// Interface actions a step of the GUI curriculum permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuiAction {
    CreateBranch,
    SwitchBranch,
    EditFile,
    StageFile,
    Commit,
    Push,
}

/// Static definition of one tutorial step.
#[derive(Debug, Clone, Copy)]
pub struct StepConfig {
    pub id: u32,
    /// Which curriculum the step belongs to.
    pub stage: TutorialStage,
    pub title: &'static str,
    pub instruction: &'static str,
    /// Git verbs the command validator accepts while this step is active.
    pub allowed_verbs: &'static [GitVerb],
    /// Interface actions a GUI host should offer on this step.
    pub allowed_gui_actions: &'static [GuiAction],
    /// Completion rules, AND-combined, evaluated in order.
    pub rules: &'static [ValidationRule],
    /// Progressive hints a host may reveal on request.
    pub hints: &'static [&'static str],
    /// Shown when the step's rules pass.
    pub success_message: &'static str,
    /// Whether completion advances the tutorial immediately. Confirmation
    /// steps are `false` and wait for an explicit next.
    pub auto_advance: bool,
    /// Whether completion is only checked on an explicit validate request
    /// instead of after every command.
    pub requires_validation_button: bool,
    /// Label for the validate control when the step requires one.
    pub validation_button_label: Option<&'static str>,
    /// Whether `git branch <name>` / `git checkout -b` may create a branch
    /// while this step is active.
    pub allow_branch_creation: bool,
}

impl StepConfig {
    pub fn is_instructional(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The terminal curriculum: clone, branch, edit, stage, commit, push, with
/// a confirmation step after each action.
pub fn terminal_steps() -> &'static [StepConfig] {
    TERMINAL_STEPS
}

static TERMINAL_STEPS: &[StepConfig] = &[
    StepConfig {
        id: 0,
        stage: TutorialStage::Terminal,
        title: "Welcome",
        instruction: "Welcome to the Git tutorial! A remote repository already exists. You \
                      will clone it, work on a branch, commit a change and push it back. \
                      Press next to begin.",
        allowed_verbs: &[],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[],
        success_message: "Ready to go. On to the first step!",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 1,
        stage: TutorialStage::Terminal,
        title: "Clone the repository",
        instruction: "Get a local copy of the sample project: git clone /remote-repo",
        allowed_verbs: &[GitVerb::Clone],
        allowed_gui_actions: &[],
        rules: &[
            ValidationRule::FileExists { path: "README.md" },
            ValidationRule::FileExists {
                path: "greeting.txt",
            },
        ],
        hints: &[
            "Use the git clone command",
            "On a real host this would be an https URL",
            "Here, run: git clone /remote-repo",
        ],
        success_message: "Cloned! The project files are now in your workspace.",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 2,
        stage: TutorialStage::Terminal,
        title: "Look at your working copy",
        instruction: "The repository now lives in /workspace with its full history. Check \
                      the file list, or run git status to see a clean working tree, then \
                      press next.",
        allowed_verbs: &[GitVerb::Status, GitVerb::Branch, GitVerb::Log],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "README.md and greeting.txt came from the remote",
            "git status confirms the working tree is clean",
            "Press next when you have had a look",
        ],
        success_message: "When you have checked the files, press next.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 3,
        stage: TutorialStage::Terminal,
        title: "Create a branch",
        instruction: "Create and switch to a work branch: \
                      git checkout -b feature/add-greeting",
        allowed_verbs: &[GitVerb::Branch, GitVerb::Checkout],
        allowed_gui_actions: &[],
        rules: &[
            ValidationRule::BranchCreated {
                name: "feature/add-greeting",
            },
            ValidationRule::BranchSwitched {
                name: "feature/add-greeting",
            },
        ],
        hints: &[
            "git checkout -b creates and switches in one move",
            "Name the branch feature/add-greeting",
            "Full command: git checkout -b feature/add-greeting",
        ],
        success_message: "Branch created and checked out!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 4,
        stage: TutorialStage::Terminal,
        title: "Confirm the branch",
        instruction: "Run git branch and check that feature/add-greeting is marked as the \
                      current branch. The files themselves are unchanged. Press next.",
        allowed_verbs: &[GitVerb::Branch, GitVerb::Status, GitVerb::Log],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "git branch marks the current branch with an asterisk",
            "Press next when you have confirmed it",
        ],
        success_message: "On feature/add-greeting? Press next.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 5,
        stage: TutorialStage::Terminal,
        title: "Edit a file",
        instruction: "Open greeting.txt and make it say: Hello, Git!  When you are done, \
                      press the check button to verify your edit.",
        allowed_verbs: &[GitVerb::Status, GitVerb::Diff],
        allowed_gui_actions: &[],
        rules: &[ValidationRule::FileContent {
            path: "greeting.txt",
            contains: "Hello, Git!",
        }],
        hints: &[
            "Open greeting.txt in the editor",
            "Add the text \"Hello, Git!\"",
            "Edits are detected automatically once you check",
        ],
        success_message: "Edit looks good!",
        auto_advance: true,
        requires_validation_button: true,
        validation_button_label: Some("Check your edit"),
        allow_branch_creation: true,
    },
    StepConfig {
        id: 6,
        stage: TutorialStage::Terminal,
        title: "See the change",
        instruction: "git status now reports greeting.txt as modified, and git diff shows \
                      exactly what changed. Take a look, then press next.",
        allowed_verbs: &[GitVerb::Status, GitVerb::Diff],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "git diff shows the exact lines you changed",
            "Press next when you have seen the change",
        ],
        success_message: "Seen the diff? Press next.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 7,
        stage: TutorialStage::Terminal,
        title: "Stage the change",
        instruction: "Put your edit into the staging area: git add greeting.txt",
        allowed_verbs: &[GitVerb::Add, GitVerb::Status],
        allowed_gui_actions: &[],
        rules: &[ValidationRule::FileStaged {
            path: "greeting.txt",
        }],
        hints: &[
            "Use the git add command",
            "Name the file, or use . to stage everything",
            "Full command: git add greeting.txt",
        ],
        success_message: "Staged! The change will be part of the next commit.",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 8,
        stage: TutorialStage::Terminal,
        title: "Confirm the staging area",
        instruction: "git status now lists greeting.txt under changes to be committed. \
                      Press next.",
        allowed_verbs: &[GitVerb::Status],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "git status shows the staged file in its own section",
            "Press next when you have confirmed it",
        ],
        success_message: "Staging confirmed? Press next.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 9,
        stage: TutorialStage::Terminal,
        title: "Commit",
        instruction: "Record the staged change: git commit -m \"Add greeting message\"",
        allowed_verbs: &[GitVerb::Commit, GitVerb::Status, GitVerb::Log],
        allowed_gui_actions: &[],
        rules: &[ValidationRule::CommitMade { min_count: 2 }],
        hints: &[
            "Use git commit -m \"message\"",
            "Any message works",
            "Example: git commit -m \"Add greeting message\"",
        ],
        success_message: "Committed!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 10,
        stage: TutorialStage::Terminal,
        title: "Check the history",
        instruction: "Run git log to see your commit on top of the initial one; git status \
                      shows a clean tree again. Press next.",
        allowed_verbs: &[GitVerb::Status, GitVerb::Log],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "git log lists commits newest first",
            "Press next when you have found your commit",
        ],
        success_message: "Found your commit in the log? Press next.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 11,
        stage: TutorialStage::Terminal,
        title: "Push",
        instruction: "Publish your branch to the remote: \
                      git push origin feature/add-greeting",
        allowed_verbs: &[GitVerb::Push, GitVerb::Status],
        allowed_gui_actions: &[],
        rules: &[ValidationRule::Pushed {
            branch: "feature/add-greeting",
        }],
        hints: &[
            "Use git push origin <branch>",
            "The branch is feature/add-greeting",
            "Full command: git push origin feature/add-greeting",
        ],
        success_message: "Pushed!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
    StepConfig {
        id: 12,
        stage: TutorialStage::Terminal,
        title: "Confirm the push",
        instruction: "The push output announced the new remote branch, and git status shows \
                      nothing left to push. Press next to continue with the same workflow \
                      through the GUI.",
        allowed_verbs: &[GitVerb::Status, GitVerb::Log],
        allowed_gui_actions: &[],
        rules: &[],
        hints: &[
            "The push output mentioned a new branch",
            "git status shows a clean, fully pushed tree",
            "Press next to enter the GUI stage",
        ],
        success_message: "Push confirmed? Press next for the GUI stage.",
        auto_advance: false,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: true,
    },
];

/// The GUI curriculum: the same workflow driven through interface actions,
/// starting with a switch back to main.
pub fn gui_steps() -> &'static [StepConfig] {
    GUI_STEPS
}

const GUI_VERBS: &[GitVerb] = &[GitVerb::Status, GitVerb::Log, GitVerb::Branch];

static GUI_STEPS: &[StepConfig] = &[
    StepConfig {
        id: 20,
        stage: TutorialStage::Gui,
        title: "Switch back to main",
        instruction: "Time to drive Git through the interface. First, use the branch menu \
                      to switch from your work branch back to main.",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::SwitchBranch],
        rules: &[ValidationRule::BranchSwitched { name: "main" }],
        hints: &[
            "Open the branch menu in the status bar",
            "Pick main from the list",
        ],
        success_message: "Back on main!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 21,
        stage: TutorialStage::Gui,
        title: "Create a branch",
        instruction: "Use the branch menu to create and switch to feature/gui-test.",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::CreateBranch, GuiAction::SwitchBranch],
        rules: &[
            ValidationRule::BranchCreated {
                name: GUI_WORK_BRANCH,
            },
            ValidationRule::BranchSwitched {
                name: GUI_WORK_BRANCH,
            },
        ],
        hints: &[
            "Open the branch menu and choose to create a branch",
            "Name it feature/gui-test",
        ],
        success_message: "Branch created through the interface!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 31,
        stage: TutorialStage::Gui,
        title: "Edit a file",
        instruction: "Open greeting.txt in the editor and make it say: Hello, Git Tutor!",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::EditFile],
        rules: &[ValidationRule::FileContent {
            path: "greeting.txt",
            contains: "Hello, Git Tutor!",
        }],
        hints: &[
            "Open greeting.txt from the file list",
            "Type \"Hello, Git Tutor!\"",
        ],
        success_message: "Edit done!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 41,
        stage: TutorialStage::Gui,
        title: "Stage the change",
        instruction: "In the source control view, press the stage button next to \
                      greeting.txt.",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::StageFile],
        rules: &[ValidationRule::FileStaged {
            path: "greeting.txt",
        }],
        hints: &[
            "Open the source control view",
            "Press the + next to the changed file",
        ],
        success_message: "Staged through the interface!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 51,
        stage: TutorialStage::Gui,
        title: "Commit",
        instruction: "Enter a commit message and press the commit button.",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::Commit],
        // The work branch forks from main, which carries the initial commit
        // only; the GUI commit is the second.
        rules: &[ValidationRule::CommitMade { min_count: 2 }],
        hints: &[
            "Type a commit message",
            "Press the commit button",
        ],
        success_message: "Committed through the interface!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
    StepConfig {
        id: 61,
        stage: TutorialStage::Gui,
        title: "Push",
        instruction: "Press the push button to publish feature/gui-test to the remote.",
        allowed_verbs: GUI_VERBS,
        allowed_gui_actions: &[GuiAction::Push],
        rules: &[ValidationRule::Pushed {
            branch: GUI_WORK_BRANCH,
        }],
        hints: &["Press the push button"],
        success_message: "Congratulations, you completed the whole tutorial!",
        auto_advance: true,
        requires_validation_button: false,
        validation_button_label: None,
        allow_branch_creation: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sequence_ids_are_ordered() {
        let ids: Vec<u32> = terminal_steps().iter().map(|s| s.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(ids.first(), Some(&0));
        assert_eq!(ids.last(), Some(&12));
    }

    #[test]
    fn test_terminal_curriculum_order_is_branch_before_edit() {
        let step = |id: u32| {
            terminal_steps()
                .iter()
                .find(|s| s.id == id)
                .unwrap_or_else(|| panic!("no step {id}"))
        };
        assert!(step(1).allowed_verbs.contains(&GitVerb::Clone));
        assert!(step(3).allowed_verbs.contains(&GitVerb::Checkout));
        assert!(matches!(
            step(5).rules[0],
            ValidationRule::FileContent { .. }
        ));
        assert!(step(7).allowed_verbs.contains(&GitVerb::Add));
        assert!(step(9).allowed_verbs.contains(&GitVerb::Commit));
        assert!(step(11).allowed_verbs.contains(&GitVerb::Push));
    }

    #[test]
    fn test_stage_tags_match_their_sequence() {
        for step in terminal_steps() {
            assert_eq!(step.stage, TutorialStage::Terminal, "step {}", step.id);
        }
        for step in gui_steps() {
            assert_eq!(step.stage, TutorialStage::Gui, "step {}", step.id);
        }
    }

    #[test]
    fn test_confirmation_steps_never_auto_advance() {
        for step in terminal_steps().iter().chain(gui_steps()) {
            if step.is_instructional() {
                assert!(!step.auto_advance, "step {} should wait for next", step.id);
            }
        }
    }

    #[test]
    fn test_action_steps_auto_advance_and_carry_success_message() {
        for step in terminal_steps().iter().chain(gui_steps()) {
            if !step.is_instructional() {
                assert!(step.auto_advance, "step {} should auto advance", step.id);
            }
            assert!(!step.success_message.is_empty(), "step {}", step.id);
        }
    }

    #[test]
    fn test_welcome_step_allows_no_commands() {
        assert!(terminal_steps()[0].allowed_verbs.is_empty());
    }

    #[test]
    fn test_validation_button_only_on_edit_step() {
        for step in terminal_steps().iter().chain(gui_steps()) {
            assert_eq!(step.requires_validation_button, step.id == 5, "step {}", step.id);
            assert_eq!(
                step.validation_button_label.is_some(),
                step.requires_validation_button,
                "step {}",
                step.id
            );
        }
    }

    #[test]
    fn test_branch_creation_gated_around_the_branch_step() {
        let step = |id: u32| terminal_steps().iter().find(|s| s.id == id).unwrap();
        assert!(step(3).allow_branch_creation);
        assert!(!step(2).allow_branch_creation);
        assert!(!step(4).allow_branch_creation);
        for step in gui_steps() {
            assert!(!step.allow_branch_creation, "step {}", step.id);
        }
    }

    #[test]
    fn test_first_gui_step_teaches_the_switch_to_main() {
        let first = &gui_steps()[0];
        assert_eq!(first.id, 20);
        assert_eq!(
            first.rules,
            &[ValidationRule::BranchSwitched { name: "main" }]
        );
        assert_eq!(first.allowed_gui_actions, &[GuiAction::SwitchBranch]);
    }

    #[test]
    fn test_gui_branch_step_allows_create_and_switch() {
        let step = gui_steps().iter().find(|s| s.id == 21).unwrap();
        assert!(step.allowed_gui_actions.contains(&GuiAction::CreateBranch));
        assert!(step.allowed_gui_actions.contains(&GuiAction::SwitchBranch));
    }

    #[test]
    fn test_gui_action_steps_name_their_actions() {
        for step in gui_steps() {
            if !step.is_instructional() {
                assert!(!step.allowed_gui_actions.is_empty(), "step {}", step.id);
            }
        }
    }
}
