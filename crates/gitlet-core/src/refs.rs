//! Branch pointers and the HEAD symbolic reference.
//!
//! Each branch is a text file under `.gitlet/branches/` whose content
//! is the tip commit id. `.gitlet/head` holds the name of the active
//! branch — HEAD always names a branch, never a commit.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GitletError, GitletResult};
use crate::fsutil::{atomic_write, plain_file_names};

/// Manages branch files and the HEAD reference.
pub struct RefStore {
    branches_dir: PathBuf,
    head_file: PathBuf,
}

impl RefStore {
    /// Create a RefStore rooted at the metadata directory.
    pub fn new(gitlet_dir: &Path) -> Self {
        Self {
            branches_dir: gitlet_dir.join("branches"),
            head_file: gitlet_dir.join("head"),
        }
    }

    /// The name of the currently checked-out branch.
    pub fn head_branch(&self) -> GitletResult<String> {
        let content = fs::read_to_string(&self.head_file)?;
        Ok(content.trim().to_string())
    }

    /// Point HEAD at the named branch.
    pub fn set_head_branch(&self, name: &str) -> GitletResult<()> {
        atomic_write(&self.head_file, name.as_bytes())
    }

    /// The tip commit id of a branch, or `None` if the branch is absent.
    pub fn branch_commit(&self, name: &str) -> GitletResult<Option<String>> {
        let path = self.branches_dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(content.trim().to_string()))
    }

    /// Move an existing (or new) branch pointer to `commit_id`.
    pub fn set_branch(&self, name: &str, commit_id: &str) -> GitletResult<()> {
        atomic_write(&self.branches_dir.join(name), commit_id.as_bytes())
    }

    /// Create a branch; fails if the name is taken.
    pub fn create_branch(&self, name: &str, commit_id: &str) -> GitletResult<()> {
        if self.branch_exists(name) {
            return Err(GitletError::BranchExists);
        }
        self.set_branch(name, commit_id)
    }

    /// Delete a branch pointer. The caller checks existence first.
    pub fn delete_branch(&self, name: &str) -> GitletResult<()> {
        fs::remove_file(self.branches_dir.join(name))?;
        Ok(())
    }

    /// True if a branch with this name exists.
    pub fn branch_exists(&self, name: &str) -> bool {
        self.branches_dir.join(name).exists()
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> GitletResult<Vec<String>> {
        plain_file_names(&self.branches_dir)
    }
}
