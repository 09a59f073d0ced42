//! Repository — the main entry point for gitlet operations.
//!
//! A Repository ties together the object store, ref store, and staging
//! area into a unified interface. One value is constructed from the
//! working directory at command entry; every command reads what it
//! needs, computes in memory, and writes back before returning.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::commit::Commit;
use crate::error::{GitletError, GitletResult};
use crate::hash;
use crate::merge::{self, MergeOutcome, Resolution};
use crate::object::ObjectStore;
use crate::refs::RefStore;
use crate::stage::StagingArea;
use crate::status::{self, StatusReport};

/// The metadata directory name.
const GITLET_DIR: &str = ".gitlet";

/// The branch created by `init`.
const DEFAULT_BRANCH: &str = "main";

/// A gitlet repository.
pub struct Repository {
    /// Root of the working directory (where `.gitlet/` lives).
    root: PathBuf,
    /// Path to the `.gitlet/` directory.
    gitlet_dir: PathBuf,
    /// Content-addressable storage for blobs and commits.
    objects: ObjectStore,
    /// Branch pointers and HEAD.
    refs: RefStore,
}

impl Repository {
    /// Initialize a new gitlet repository in the given directory.
    ///
    /// Creates the `.gitlet/` structure, the reproducible initial
    /// commit, and the `main` branch pointing at it.
    pub fn init(root: &Path) -> GitletResult<Self> {
        let gitlet_dir = root.join(GITLET_DIR);

        if gitlet_dir.exists() {
            return Err(GitletError::AlreadyInitialized);
        }

        fs::create_dir_all(gitlet_dir.join("blobs"))?;
        fs::create_dir_all(gitlet_dir.join("commits"))?;
        fs::create_dir_all(gitlet_dir.join("branches"))?;

        let repo = Self::open(root)?;

        StagingArea::default().save(&repo.stage_path())?;

        let initial = Commit::initial();
        repo.objects.put_commit(&initial)?;
        repo.refs.create_branch(DEFAULT_BRANCH, &initial.id)?;
        repo.refs.set_head_branch(DEFAULT_BRANCH)?;

        debug!(id = %initial.id, "initialized repository");
        Ok(repo)
    }

    /// Open an existing gitlet repository.
    pub fn open(root: &Path) -> GitletResult<Self> {
        let gitlet_dir = root.join(GITLET_DIR);

        if !gitlet_dir.exists() {
            return Err(GitletError::NotInitialized);
        }

        let objects = ObjectStore::new(&gitlet_dir);
        let refs = RefStore::new(&gitlet_dir);

        Ok(Self {
            root: root.to_path_buf(),
            gitlet_dir,
            objects,
            refs,
        })
    }

    // -------------------------------------------------------------------
    // Staging
    // -------------------------------------------------------------------

    /// Stage a working file for addition.
    ///
    /// If the file's current content matches what HEAD already tracks,
    /// any staged change for the path is canceled instead. A pending
    /// removal is canceled either way.
    pub fn add(&self, path: &str) -> GitletResult<()> {
        let file = self.root.join(path);
        if !file.exists() {
            return Err(GitletError::FileDoesNotExist);
        }

        let content = fs::read(&file)?;
        let blob_id = hash::hash_bytes(&content);
        let head = self.head_commit()?;
        let mut stage = self.load_stage()?;

        if head.blob_id(path) == Some(blob_id.as_str()) {
            stage.unstage_add(path);
        } else {
            self.objects.put_blob(&content)?;
            stage.stage_add(path, blob_id);
        }
        stage.unstage_remove(path);

        self.save_stage(&stage)
    }

    /// Unstage a file, or stage a tracked file for removal and delete
    /// its working copy.
    pub fn remove(&self, path: &str) -> GitletResult<()> {
        let head = self.head_commit()?;
        let mut stage = self.load_stage()?;
        let tracked = head.tracks(path);

        if !stage.is_added(path) && !tracked {
            return Err(GitletError::NoReasonToRemove);
        }

        stage.unstage_add(path);
        if tracked {
            stage.stage_remove(path);
            let file = self.root.join(path);
            if file.exists() {
                fs::remove_file(&file)?;
            }
        }

        self.save_stage(&stage)
    }

    // -------------------------------------------------------------------
    // Commits
    // -------------------------------------------------------------------

    /// Create a commit from HEAD plus the staged changes.
    pub fn commit(&self, message: &str) -> GitletResult<Commit> {
        if message.trim().is_empty() {
            return Err(GitletError::EmptyMessage);
        }

        let mut stage = self.load_stage()?;
        if stage.is_empty() {
            return Err(GitletError::NothingStaged);
        }

        let head = self.head_commit()?;
        let mut files = head.files.clone();
        for path in &stage.removed {
            files.remove(path);
        }
        for (path, blob_id) in &stage.added {
            files.insert(path.clone(), blob_id.clone());
        }

        let commit = Commit::new(message.to_string(), Some(head.id.clone()), None, files);
        self.objects.put_commit(&commit)?;

        let branch = self.refs.head_branch()?;
        self.refs.set_branch(&branch, &commit.id)?;

        stage.clear();
        self.save_stage(&stage)?;

        debug!(id = %commit.id, branch = %branch, "created commit");
        Ok(commit)
    }

    // -------------------------------------------------------------------
    // History queries
    // -------------------------------------------------------------------

    /// The commit history of the current branch (newest first), first
    /// parents only.
    pub fn log(&self) -> GitletResult<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut current = Some(self.head_commit()?);

        while let Some(commit) = current {
            current = match &commit.parent {
                Some(parent_id) => Some(self.objects.get_commit(parent_id)?),
                None => None,
            };
            commits.push(commit);
        }

        Ok(commits)
    }

    /// Every stored commit, in sorted-id enumeration order.
    pub fn global_log(&self) -> GitletResult<Vec<Commit>> {
        let mut commits = Vec::new();
        for id in self.objects.list_commit_ids()? {
            commits.push(self.objects.get_commit(&id)?);
        }
        Ok(commits)
    }

    /// Ids of every commit whose message equals `message` exactly.
    pub fn find(&self, message: &str) -> GitletResult<Vec<String>> {
        let mut ids = Vec::new();
        for id in self.objects.list_commit_ids()? {
            if self.objects.get_commit(&id)?.message == message {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Compute the full `status` report.
    pub fn status(&self) -> GitletResult<StatusReport> {
        let head = self.head_commit()?;
        let stage = self.load_stage()?;

        Ok(StatusReport {
            branches: self.refs.list_branches()?,
            current_branch: self.refs.head_branch()?,
            staged: stage.added.keys().cloned().collect(),
            removed: stage.removed.iter().cloned().collect(),
            modifications: status::modifications_not_staged(&self.root, &head.files, &stage)?,
            untracked: status::untracked_files(&self.root, &head.files, &stage),
        })
    }

    // -------------------------------------------------------------------
    // Working-tree reconciliation
    // -------------------------------------------------------------------

    /// Overwrite the working copy of `path` with HEAD's blob for it.
    ///
    /// Staging and every other working file are untouched.
    pub fn restore_from_head(&self, path: &str) -> GitletResult<()> {
        let head = self.head_commit()?;
        self.restore_file(&head, path)
    }

    /// Overwrite the working copy of `path` from the commit named by
    /// `prefix` (any leading substring of its id).
    pub fn restore_from_commit(&self, prefix: &str, path: &str) -> GitletResult<()> {
        let id = self
            .objects
            .resolve_prefix(prefix)?
            .ok_or(GitletError::NoSuchCommit)?;
        let commit = self.objects.get_commit(&id)?;
        self.restore_file(&commit, path)
    }

    /// Create a branch pointing at the current HEAD commit.
    pub fn create_branch(&self, name: &str) -> GitletResult<()> {
        let head = self.head_commit()?;
        self.refs.create_branch(name, &head.id)
    }

    /// Delete a branch pointer (never the checked-out one).
    pub fn remove_branch(&self, name: &str) -> GitletResult<()> {
        if !self.refs.branch_exists(name) {
            return Err(GitletError::BranchNotFound);
        }
        if self.refs.head_branch()? == name {
            return Err(GitletError::CannotRemoveCurrentBranch);
        }
        self.refs.delete_branch(name)
    }

    /// Check out a branch: materialize its tip and point HEAD at it.
    pub fn switch(&self, name: &str) -> GitletResult<()> {
        if !self.refs.branch_exists(name) {
            return Err(GitletError::NoSuchBranch);
        }
        if self.refs.head_branch()? == name {
            return Err(GitletError::AlreadyOnBranch);
        }

        let target_id = self
            .refs
            .branch_commit(name)?
            .ok_or(GitletError::NoSuchBranch)?;
        let target = self.objects.get_commit(&target_id)?;
        let head = self.head_commit()?;

        self.check_untracked(&target)?;
        self.materialize(&head, &target)?;
        self.refs.set_head_branch(name)?;

        debug!(branch = %name, "switched branch");
        Ok(())
    }

    /// Move the current branch to an arbitrary commit and materialize
    /// its tree. HEAD keeps naming the same branch.
    pub fn reset(&self, prefix: &str) -> GitletResult<()> {
        let id = self
            .objects
            .resolve_prefix(prefix)?
            .ok_or(GitletError::NoSuchCommit)?;
        let target = self.objects.get_commit(&id)?;
        let head = self.head_commit()?;

        self.check_untracked(&target)?;
        self.materialize(&head, &target)?;

        let branch = self.refs.head_branch()?;
        self.refs.set_branch(&branch, &id)?;

        debug!(branch = %branch, id = %id, "reset branch");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Merge
    // -------------------------------------------------------------------

    /// Merge the named branch into the current one.
    pub fn merge(&self, branch_name: &str) -> GitletResult<MergeOutcome> {
        let stage = self.load_stage()?;
        if !stage.is_empty() {
            return Err(GitletError::UncommittedChanges);
        }

        let other_id = self
            .refs
            .branch_commit(branch_name)?
            .ok_or(GitletError::BranchNotFound)?;
        let current_branch = self.refs.head_branch()?;
        if branch_name == current_branch {
            return Err(GitletError::MergeWithSelf);
        }

        let other = self.objects.get_commit(&other_id)?;
        let current = self.head_commit()?;
        self.check_untracked(&other)?;

        let split = merge::split_point(&self.objects, &current, &other)?;
        debug!(split = %split.id, "found split point");

        if split.id == current.id {
            // The current branch has no work of its own: advance its
            // pointer to the other tip instead of creating a commit.
            self.materialize(&current, &other)?;
            self.refs.set_branch(&current_branch, &other.id)?;
            return Ok(MergeOutcome::FastForwarded);
        }
        if split.id == other.id {
            return Ok(MergeOutcome::AlreadyAncestor);
        }

        let mut stage = stage;
        let mut conflicts = Vec::new();

        let all_paths: BTreeSet<&String> = split
            .files
            .keys()
            .chain(current.files.keys())
            .chain(other.files.keys())
            .collect();

        for path in all_paths {
            let s = split.blob_id(path);
            let c = current.blob_id(path);
            let o = other.blob_id(path);

            match merge::resolve(s, c, o) {
                Resolution::Conflict => {
                    let current_bytes = match c {
                        Some(id) => self.objects.get_blob(id)?,
                        None => Vec::new(),
                    };
                    let other_bytes = match o {
                        Some(id) => self.objects.get_blob(id)?,
                        None => Vec::new(),
                    };
                    let bytes = merge::conflict_bytes(&current_bytes, &other_bytes);
                    fs::write(self.root.join(path), &bytes)?;
                    let blob_id = self.objects.put_blob(&bytes)?;
                    stage.stage_add(path, blob_id);
                    conflicts.push(path.clone());
                }
                Resolution::TakeOther => {
                    if let Some(other_blob) = o {
                        let bytes = self.objects.get_blob(other_blob)?;
                        fs::write(self.root.join(path), bytes)?;
                        stage.stage_add(path, other_blob.to_string());
                    }
                }
                Resolution::Remove => {
                    stage.stage_remove(path);
                    let file = self.root.join(path);
                    if file.exists() {
                        fs::remove_file(&file)?;
                    }
                }
                Resolution::DeleteLocal => {
                    let file = self.root.join(path);
                    if file.exists() {
                        fs::remove_file(&file)?;
                    }
                }
                Resolution::Keep => {}
            }
        }

        // The merge commit's tree is the staged-additions snapshot:
        // paths untouched on both sides are not carried forward.
        let message = format!("Merged {branch_name} into {current_branch}.");
        let commit = Commit::new(
            message,
            Some(current.id.clone()),
            Some(other.id.clone()),
            stage.added.clone(),
        );
        self.objects.put_commit(&commit)?;
        self.refs.set_branch(&current_branch, &commit.id)?;

        stage.clear();
        self.save_stage(&stage)?;

        debug!(id = %commit.id, conflicts = conflicts.len(), "created merge commit");
        Ok(MergeOutcome::Merged {
            commit_id: commit.id,
            conflicts,
        })
    }

    // -------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------

    /// The commit at the tip of the branch HEAD names.
    pub fn head_commit(&self) -> GitletResult<Commit> {
        let branch = self.refs.head_branch()?;
        let id = self
            .refs
            .branch_commit(&branch)?
            .ok_or_else(|| GitletError::ObjectNotFound(branch.clone()))?;
        self.objects.get_commit(&id)
    }

    fn stage_path(&self) -> PathBuf {
        self.gitlet_dir.join("staging_area")
    }

    fn load_stage(&self) -> GitletResult<StagingArea> {
        StagingArea::load(&self.stage_path())
    }

    fn save_stage(&self, stage: &StagingArea) -> GitletResult<()> {
        stage.save(&self.stage_path())
    }

    /// Write one file from a commit into the working tree.
    fn restore_file(&self, commit: &Commit, path: &str) -> GitletResult<()> {
        let blob_id = commit.blob_id(path).ok_or(GitletError::FileNotInCommit)?;
        let bytes = self.objects.get_blob(blob_id)?;
        fs::write(self.root.join(path), bytes)?;
        Ok(())
    }

    /// Abort if an untracked working file would be overwritten by
    /// materializing `target`. Runs before any write.
    fn check_untracked(&self, target: &Commit) -> GitletResult<()> {
        let head = self.head_commit()?;
        let stage = self.load_stage()?;
        for path in status::untracked_files(&self.root, &head.files, &stage) {
            if target.tracks(&path) {
                return Err(GitletError::UntrackedFileInTheWay);
            }
        }
        Ok(())
    }

    /// Make the working tree match `to`: write every file `to` tracks,
    /// delete files tracked by `from` but absent from `to`, and clear
    /// the staging area.
    fn materialize(&self, from: &Commit, to: &Commit) -> GitletResult<()> {
        for (path, blob_id) in &to.files {
            let bytes = self.objects.get_blob(blob_id)?;
            fs::write(self.root.join(path), bytes)?;
        }
        for path in from.files.keys() {
            if !to.tracks(path) {
                let file = self.root.join(path);
                if file.exists() {
                    fs::remove_file(&file)?;
                }
            }
        }

        let mut stage = self.load_stage()?;
        stage.clear();
        self.save_stage(&stage)
    }
}
