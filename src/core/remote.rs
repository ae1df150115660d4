//! Simulated remote repository and push tracking.
//!
//! The tutorial has no network; the "remote" is a second local repository
//! under the session root, seeded with the sample project. Pushes do not
//! transport objects anywhere. Instead [`RemoteTracking`] records which
//! commit oids and branch names the remote has been told about, and the
//! backend derives the ahead count and remote branch list from that record.
//!
//! # Public API
//! - [`RemoteSimulator`]: Creates the remote, clones it, accepts pushes
//! - [`RemoteTracking`]: The oid/branch record the state projection reads

use crate::core::{
    config::{GIT_METADATA_DIR, INITIAL_FILES},
    error::{Result, TutorError},
    git::GitBackend,
};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// What the simulated remote knows: every pushed commit oid and every branch
/// name it has received. Both start empty and only grow until a reset.
#[derive(Debug, Clone, Default)]
pub struct RemoteTracking {
    mirrored: HashSet<String>,
    remote_branches: BTreeSet<String>,
    has_remote: bool,
}

impl RemoteTracking {
    pub fn is_mirrored(&self, oid: &str) -> bool {
        self.mirrored.contains(oid)
    }

    pub fn is_branch_tracked(&self, name: &str) -> bool {
        self.remote_branches.contains(name)
    }

    /// Remote branch names, `origin/` prefixed, in sorted order.
    pub fn remote_branch_names(&self) -> Vec<String> {
        self.remote_branches
            .iter()
            .map(|name| format!("origin/{name}"))
            .collect()
    }

    pub fn has_remote(&self) -> bool {
        self.has_remote
    }

    /// Record the commits present at clone time. They came from the remote,
    /// so they count as mirrored from the start.
    pub fn record_baseline(&mut self, branch: &str, oids: Vec<String>) {
        self.mirrored.extend(oids);
        self.remote_branches.insert(branch.to_string());
        self.has_remote = true;
    }

    /// Record one accepted push. Returns true when the branch was new to the
    /// remote.
    pub fn record_push(&mut self, branch: &str, oids: Vec<String>) -> bool {
        self.mirrored.extend(oids);
        self.remote_branches.insert(branch.to_string())
    }

    pub fn reset(&mut self) {
        self.mirrored.clear();
        self.remote_branches.clear();
        self.has_remote = false;
    }
}

/// Owns the remote directory and the tracking record.
pub struct RemoteSimulator {
    remote_dir: PathBuf,
    tracking: RemoteTracking,
}

impl RemoteSimulator {
    pub fn new(remote_dir: impl Into<PathBuf>) -> Self {
        RemoteSimulator {
            remote_dir: remote_dir.into(),
            tracking: RemoteTracking::default(),
        }
    }

    pub fn remote_dir(&self) -> &Path {
        &self.remote_dir
    }

    pub fn tracking(&self) -> &RemoteTracking {
        &self.tracking
    }

    /// Create and seed the remote repository. Idempotent: an existing
    /// repository is left untouched.
    pub fn create_remote_repository(&self, backend: &GitBackend) -> Result<()> {
        if backend.is_repository(&self.remote_dir) {
            return Ok(());
        }
        backend.init(&self.remote_dir)?;
        for (path, content) in INITIAL_FILES {
            let target = self.remote_dir.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(target, content)?;
        }
        backend.stage_all(&self.remote_dir)?;
        backend.commit(&self.remote_dir, "Initial commit")?;
        Ok(())
    }

    /// Materialize a clone of the remote into `workspace_dir`.
    ///
    /// The clone is rebuilt rather than object-copied: a fresh repository
    /// whose working tree mirrors the remote's, with one initial commit.
    /// That commit is recorded as the mirrored baseline, so a fresh clone
    /// reports zero commits ahead.
    pub fn clone_to_workspace(
        &mut self,
        backend: &GitBackend,
        workspace_dir: &Path,
    ) -> Result<()> {
        if !backend.is_repository(&self.remote_dir) {
            return Err(TutorError::not_a_repository(&self.remote_dir));
        }
        backend.init(workspace_dir)?;
        copy_working_tree(&self.remote_dir, workspace_dir)?;
        backend.stage_all(workspace_dir)?;
        backend.commit(workspace_dir, "Initial commit")?;

        let oids = backend.branch_oids(workspace_dir, "main")?;
        self.tracking.record_baseline("main", oids);
        Ok(())
    }

    /// Accept a push of `branch` from the workspace. Returns true when the
    /// branch is new to the remote.
    pub fn simulate_push(
        &mut self,
        backend: &GitBackend,
        workspace_dir: &Path,
        branch: &str,
    ) -> Result<bool> {
        let oids = backend.branch_oids(workspace_dir, branch)?;
        if oids.is_empty() {
            return Err(TutorError::NothingToPush);
        }
        Ok(self.tracking.record_push(branch, oids))
    }

    pub fn reset_tracking(&mut self) {
        self.tracking.reset();
    }
}

/// Copy every working-tree file, skipping git metadata.
fn copy_working_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == GIT_METADATA_DIR {
            continue;
        }
        let source = entry.path();
        let target = to.join(&name);
        if source.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_working_tree(&source, &target)?;
        } else {
            std::fs::copy(&source, &target)?;
        }
    }
    Ok(())
}
