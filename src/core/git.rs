//! Git repository operations and derived-state projection.
//!
//! This module provides [`GitBackend`], a thin façade over the `git2` library
//! exposing exactly the operation subset the tutorial needs: init, add,
//! commit, branch, checkout, log, status classification and diff, plus the
//! full derived [`GitState`] snapshot both tutorial consumers read.
//!
//! # Public API
//! - [`GitBackend`]: Main interface, keyed by repository directory
//!
//! Every method opens the repository fresh; the backend holds no state of its
//! own, so a snapshot can never go stale across mutations.

use crate::core::{
    config::{AUTHOR_EMAIL, AUTHOR_NAME, GIT_METADATA_DIR, LOG_DEPTH},
    diff,
    error::{Result, TutorError},
    git_status::FileStatus,
    remote::RemoteTracking,
    state::{GitCommit, GitFile, GitState},
};
use git2::{build::CheckoutBuilder, Repository, RepositoryInitOptions, Signature, StatusOptions};
use std::path::Path;

pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        GitBackend
    }

    fn open(&self, dir: &Path) -> Result<Repository> {
        Repository::open(dir).map_err(|_| TutorError::not_a_repository(dir))
    }

    pub fn is_repository(&self, dir: &Path) -> bool {
        dir.join(GIT_METADATA_DIR).is_dir()
    }

    /// Initialize an empty repository whose unborn HEAD points at `main`.
    pub fn init(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        Repository::init_opts(dir, &opts)?;
        Ok(())
    }

    /// Stage one path. A path missing from the working tree is staged as a
    /// deletion.
    pub fn add(&self, dir: &Path, path: &str) -> Result<()> {
        let repo = self.open(dir)?;
        let mut index = repo.index()?;
        if dir.join(path).exists() {
            index.add_path(Path::new(path))?;
        } else {
            index.remove_path(Path::new(path))?;
        }
        index.write()?;
        Ok(())
    }

    /// Stage every change in the working tree.
    pub fn stage_all(&self, dir: &Path) -> Result<()> {
        let repo = self.open(dir)?;
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    /// Reset one path in the index back to HEAD (the GUI "unstage" action).
    pub fn unstage(&self, dir: &Path, path: &str) -> Result<()> {
        let repo = self.open(dir)?;
        let head = repo
            .head()
            .map_err(|_| TutorError::UnbornHead)?
            .peel(git2::ObjectType::Commit)?;
        repo.reset_default(Some(&head), [path])?;
        Ok(())
    }

    /// Commit the index with the fixed tutorial author, returning the oid.
    pub fn commit(&self, dir: &Path, message: &str) -> Result<String> {
        let repo = self.open(dir)?;
        let signature = Signature::now(AUTHOR_NAME, AUTHOR_EMAIL)?;

        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None, // first commit on an unborn HEAD
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(oid.to_string())
    }

    /// Create a branch at the current HEAD, optionally switching to it.
    pub fn branch(&self, dir: &Path, name: &str, checkout: bool) -> Result<()> {
        let repo = self.open(dir)?;
        let head_commit = repo
            .head()
            .map_err(|_| TutorError::UnbornHead)?
            .peel_to_commit()?;
        repo.branch(name, &head_commit, false)?;
        if checkout {
            // Same commit, so the working tree needs no update.
            repo.set_head(&format!("refs/heads/{name}"))?;
        }
        Ok(())
    }

    /// Switch to an existing branch. Safe checkout: refuses to clobber
    /// modified files.
    pub fn checkout(&self, dir: &Path, name: &str) -> Result<()> {
        let repo = self.open(dir)?;
        let refname = format!("refs/heads/{name}");
        let object = repo
            .revparse_single(&refname)
            .map_err(|_| TutorError::branch_not_found(name))?;
        repo.checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;
        repo.set_head(&refname)?;
        Ok(())
    }

    pub fn current_branch(&self, dir: &Path) -> Result<String> {
        let repo = self.open(dir)?;
        let name = match repo.head() {
            Ok(head) => head.shorthand().unwrap_or("main").to_string(),
            // Unborn HEAD still names the initial branch.
            Err(_) => "main".to_string(),
        };
        Ok(name)
    }

    pub fn list_branches(&self, dir: &Path) -> Result<Vec<String>> {
        let repo = self.open(dir)?;
        let mut names = Vec::new();
        for entry in repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Commit history from HEAD, most recent first, bounded by `depth`.
    pub fn log(&self, dir: &Path, depth: usize) -> Result<Vec<GitCommit>> {
        let repo = self.open(dir)?;
        if repo.head().is_err() {
            return Ok(Vec::new());
        }

        let mut walk = repo.revwalk()?;
        walk.push_head()?;

        let mut commits = Vec::new();
        for oid in walk.take(depth) {
            let oid = oid?;
            let commit = repo.find_commit(oid)?;
            let author = commit.author();
            commits.push(GitCommit {
                oid: oid.to_string(),
                message: commit.message().unwrap_or("").trim_end().to_string(),
                author: author.name().unwrap_or("").to_string(),
                email: author.email().unwrap_or("").to_string(),
                timestamp: commit.time().seconds(),
            });
        }
        Ok(commits)
    }

    /// Every commit oid reachable from the named branch tip.
    pub fn branch_oids(&self, dir: &Path, branch: &str) -> Result<Vec<String>> {
        let repo = self.open(dir)?;
        let reference = repo
            .find_branch(branch, git2::BranchType::Local)
            .map_err(|_| TutorError::branch_not_found(branch))?;
        let tip = reference
            .get()
            .target()
            .ok_or_else(|| TutorError::branch_not_found(branch))?;

        let mut walk = repo.revwalk()?;
        walk.push(tip)?;
        let mut oids = Vec::new();
        for oid in walk {
            oids.push(oid?.to_string());
        }
        Ok(oids)
    }

    /// Paths with any staged or unstaged change, metadata excluded.
    pub fn changed_paths(&self, dir: &Path) -> Result<Vec<String>> {
        let repo = self.open(dir)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        let mut paths = Vec::new();
        for entry in statuses.iter() {
            let path = entry.path().ok_or(TutorError::InvalidUtf8Path)?;
            if path.starts_with(GIT_METADATA_DIR) {
                continue;
            }
            paths.push(path.to_string());
        }
        paths.sort();
        Ok(paths)
    }

    /// Content of `path` in the HEAD tree, empty string when absent.
    pub fn head_content(&self, dir: &Path, path: &str) -> Result<String> {
        let repo = self.open(dir)?;
        let tree = match repo.head() {
            Ok(head) => head.peel_to_tree()?,
            Err(_) => return Ok(String::new()),
        };
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(_) => return Ok(String::new()),
        };
        let blob = repo.find_blob(entry.id())?;
        let content = std::str::from_utf8(blob.content())
            .map_err(|_| TutorError::InvalidUtf8Content)?;
        Ok(content.to_string())
    }

    /// Unified diff of one path, or of every changed path when `path` is
    /// `None`. Working-tree content of a deleted file reads as empty.
    pub fn diff(&self, dir: &Path, path: Option<&str>) -> Result<String> {
        let paths = match path {
            Some(path) => vec![path.to_string()],
            None => self.changed_paths(dir)?,
        };
        if paths.is_empty() {
            return Ok("No changes".to_string());
        }

        let mut blocks = Vec::new();
        for path in &paths {
            let old = self.head_content(dir, path)?;
            let new = match std::fs::read_to_string(dir.join(path)) {
                Ok(content) => content,
                Err(_) => String::new(),
            };
            blocks.push(diff::format_unified(path, &old, &new));
        }
        Ok(blocks.join("\n"))
    }

    /// Derive the full [`GitState`] snapshot for the workspace.
    ///
    /// Each status entry lands in exactly one bucket: a path carrying both
    /// index and worktree changes reports its staged classification, which
    /// keeps the staged/unstaged sets disjoint.
    pub fn get_git_state(&self, dir: &Path, tracking: &RemoteTracking) -> Result<GitState> {
        if !self.is_repository(dir) {
            return Ok(GitState::empty());
        }

        let current_branch = self.current_branch(dir)?;
        let branches = self.list_branches(dir)?;
        let commits = self.log(dir, LOG_DEPTH)?;

        let repo = self.open(dir)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = repo.statuses(Some(&mut opts))?;

        let mut staged_files = Vec::new();
        let mut unstaged_files = Vec::new();
        for entry in statuses.iter() {
            let path = entry.path().ok_or(TutorError::InvalidUtf8Path)?;
            if path.starts_with(GIT_METADATA_DIR) {
                continue;
            }
            let flags = entry.status();
            if let Some(status) = FileStatus::from_staged_flags(flags) {
                staged_files.push(GitFile {
                    path: path.to_string(),
                    status,
                });
            } else if let Some(status) = FileStatus::from_unstaged_flags(flags) {
                unstaged_files.push(GitFile {
                    path: path.to_string(),
                    status,
                });
            }
        }
        staged_files.sort_by(|a, b| a.path.cmp(&b.path));
        unstaged_files.sort_by(|a, b| a.path.cmp(&b.path));

        let ahead_count = self.count_unmirrored(&repo, tracking)?;

        Ok(GitState {
            is_repository: true,
            current_branch,
            branches,
            remote_branches: tracking.remote_branch_names(),
            staged_files,
            unstaged_files,
            commits,
            has_remote: tracking.has_remote(),
            ahead_count,
            // The simulated remote never advances on its own.
            behind_count: 0,
        })
    }

    /// Commits reachable from HEAD that the remote tracking record has not
    /// seen. Ancestors of a mirrored commit are mirrored by construction, so
    /// the walk stops at the first known oid.
    fn count_unmirrored(&self, repo: &Repository, tracking: &RemoteTracking) -> Result<usize> {
        if repo.head().is_err() {
            return Ok(0);
        }
        let mut walk = repo.revwalk()?;
        walk.push_head()?;

        let mut count = 0;
        for oid in walk {
            let oid = oid?.to_string();
            if tracking.is_mirrored(&oid) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_repo() -> Result<(TempDir, GitBackend)> {
        let temp_dir = TempDir::new()?;
        let backend = GitBackend::new();
        backend.init(temp_dir.path())?;
        Ok((temp_dir, backend))
    }

    fn write_file(dir: &Path, path: &str, content: &str) -> Result<()> {
        if let Some(parent) = dir.join(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dir.join(path), content)?;
        Ok(())
    }

    #[test]
    fn test_init_creates_repository_on_main() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        assert!(backend.is_repository(dir.path()));
        assert_eq!(backend.current_branch(dir.path())?, "main");
        Ok(())
    }

    #[test]
    fn test_add_and_commit_round_trip() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        write_file(dir.path(), "a.txt", "content\n")?;
        backend.add(dir.path(), "a.txt")?;
        let oid = backend.commit(dir.path(), "First")?;
        assert_eq!(oid.len(), 40);

        let commits = backend.log(dir.path(), 10)?;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "First");
        assert_eq!(commits[0].author, AUTHOR_NAME);
        Ok(())
    }

    #[test]
    fn test_log_on_unborn_head_is_empty() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        assert!(backend.log(dir.path(), 10)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_branch_create_and_checkout() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        write_file(dir.path(), "a.txt", "content\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        backend.branch(dir.path(), "feature/add-greeting", true)?;
        assert_eq!(
            backend.current_branch(dir.path())?,
            "feature/add-greeting"
        );
        assert_eq!(
            backend.list_branches(dir.path())?,
            vec!["feature/add-greeting".to_string(), "main".to_string()]
        );

        backend.checkout(dir.path(), "main")?;
        assert_eq!(backend.current_branch(dir.path())?, "main");
        Ok(())
    }

    #[test]
    fn test_checkout_missing_branch_fails() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        write_file(dir.path(), "a.txt", "content\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        assert!(backend.checkout(dir.path(), "nope").is_err());
        Ok(())
    }

    #[test]
    fn test_state_buckets_untracked_then_staged() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        let tracking = RemoteTracking::default();
        write_file(dir.path(), "new.txt", "hello\n")?;

        let state = backend.get_git_state(dir.path(), &tracking)?;
        assert_eq!(state.unstaged_files.len(), 1);
        assert_eq!(state.unstaged_files[0].status, FileStatus::Untracked);
        assert!(state.staged_files.is_empty());

        backend.add(dir.path(), "new.txt")?;
        let state = backend.get_git_state(dir.path(), &tracking)?;
        assert_eq!(state.staged_files.len(), 1);
        assert_eq!(state.staged_files[0].status, FileStatus::Added);
        assert!(state.unstaged_files.is_empty());
        Ok(())
    }

    #[test]
    fn test_state_buckets_are_disjoint() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        let tracking = RemoteTracking::default();
        write_file(dir.path(), "a.txt", "one\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        // Staged modification plus a further worktree edit on the same path.
        write_file(dir.path(), "a.txt", "two\n")?;
        backend.add(dir.path(), "a.txt")?;
        write_file(dir.path(), "a.txt", "three\n")?;

        let state = backend.get_git_state(dir.path(), &tracking)?;
        let staged: Vec<&str> = state.staged_files.iter().map(|f| f.path.as_str()).collect();
        let unstaged: Vec<&str> = state
            .unstaged_files
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert!(staged.contains(&"a.txt"));
        assert!(!unstaged.contains(&"a.txt"));
        Ok(())
    }

    #[test]
    fn test_unstage_resets_index_entry() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        let tracking = RemoteTracking::default();
        write_file(dir.path(), "a.txt", "one\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        write_file(dir.path(), "a.txt", "two\n")?;
        backend.add(dir.path(), "a.txt")?;
        assert!(backend
            .get_git_state(dir.path(), &tracking)?
            .is_file_staged("a.txt"));

        backend.unstage(dir.path(), "a.txt")?;
        let state = backend.get_git_state(dir.path(), &tracking)?;
        assert!(!state.is_file_staged("a.txt"));
        assert_eq!(state.unstaged_files.len(), 1);
        Ok(())
    }

    #[test]
    fn test_diff_against_head_blob() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        write_file(dir.path(), "a.txt", "a\nb\nc\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        write_file(dir.path(), "a.txt", "a\nx\nc\n")?;
        let out = backend.diff(dir.path(), Some("a.txt"))?;
        assert!(out.contains("-b\n"));
        assert!(out.contains("+x\n"));
        assert!(out.contains(" a\n"));
        Ok(())
    }

    #[test]
    fn test_diff_with_nothing_changed() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        write_file(dir.path(), "a.txt", "a\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        assert_eq!(backend.diff(dir.path(), None)?, "No changes");
        Ok(())
    }

    #[test]
    fn test_state_is_idempotent_without_mutations() -> Result<()> {
        let (dir, backend) = setup_repo()?;
        let tracking = RemoteTracking::default();
        write_file(dir.path(), "a.txt", "one\n")?;
        backend.add(dir.path(), "a.txt")?;
        backend.commit(dir.path(), "First")?;

        let first = backend.get_git_state(dir.path(), &tracking)?;
        let second = backend.get_git_state(dir.path(), &tracking)?;
        assert_eq!(first, second);
        Ok(())
    }
}
