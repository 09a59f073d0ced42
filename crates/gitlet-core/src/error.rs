//! Error types for gitlet operations.
//!
//! Expected failures carry the exact message the CLI prints; the
//! process still exits 0 after printing them.

use std::fmt;
use std::io;

/// All possible gitlet errors.
#[derive(Debug)]
pub enum GitletError {
    /// A `.gitlet` directory already exists here.
    AlreadyInitialized,
    /// The current directory is not a gitlet repository.
    NotInitialized,
    /// `add` named a working file that does not exist.
    FileDoesNotExist,
    /// `commit` was given an empty or whitespace-only message.
    EmptyMessage,
    /// `commit` with nothing staged.
    NothingStaged,
    /// `rm` named a file that is neither staged nor tracked.
    NoReasonToRemove,
    /// No stored commit matches the given id or prefix.
    NoSuchCommit,
    /// The named commit does not track the requested file.
    FileNotInCommit,
    /// `switch` named a branch that does not exist.
    NoSuchBranch,
    /// `switch` to the branch that is already checked out.
    AlreadyOnBranch,
    /// `branch` with a name that is already taken.
    BranchExists,
    /// `rm-branch`/`merge` named a branch that does not exist.
    BranchNotFound,
    /// `rm-branch` of the checked-out branch.
    CannotRemoveCurrentBranch,
    /// `merge` with a non-empty staging area.
    UncommittedChanges,
    /// `merge` of the current branch into itself.
    MergeWithSelf,
    /// An untracked working file would be overwritten or removed.
    UntrackedFileInTheWay,
    /// An object with the given id was not found in the store.
    ObjectNotFound(String),
    /// An I/O error occurred.
    Io(io::Error),
    /// JSON serialization/deserialization failed.
    Json(serde_json::Error),
    /// Generic error with a message.
    Other(String),
}

impl fmt::Display for GitletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitletError::AlreadyInitialized => write!(
                f,
                "A Gitlet version-control system already exists in the current directory."
            ),
            GitletError::NotInitialized => {
                write!(f, "Not in an initialized Gitlet directory.")
            }
            GitletError::FileDoesNotExist => write!(f, "File does not exist."),
            GitletError::EmptyMessage => write!(f, "Please enter a commit message."),
            GitletError::NothingStaged => write!(f, "No changes added to the commit."),
            GitletError::NoReasonToRemove => write!(f, "No reason to remove the file."),
            GitletError::NoSuchCommit => write!(f, "No commit with that id exists."),
            GitletError::FileNotInCommit => {
                write!(f, "File does not exist in that commit.")
            }
            GitletError::NoSuchBranch => write!(f, "No such branch exists."),
            GitletError::AlreadyOnBranch => {
                write!(f, "No need to switch to the current branch.")
            }
            GitletError::BranchExists => {
                write!(f, "A branch with that name already exists.")
            }
            GitletError::BranchNotFound => {
                write!(f, "A branch with that name does not exist.")
            }
            GitletError::CannotRemoveCurrentBranch => {
                write!(f, "Cannot remove the current branch.")
            }
            GitletError::UncommittedChanges => write!(f, "You have uncommitted changes."),
            GitletError::MergeWithSelf => {
                write!(f, "Cannot merge a branch with itself.")
            }
            GitletError::UntrackedFileInTheWay => write!(
                f,
                "There is an untracked file in the way; delete it, or add and commit it first."
            ),
            GitletError::ObjectNotFound(id) => write!(f, "object not found: {id}"),
            GitletError::Io(e) => write!(f, "I/O error: {e}"),
            GitletError::Json(e) => write!(f, "JSON error: {e}"),
            GitletError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GitletError {}

impl From<io::Error> for GitletError {
    fn from(e: io::Error) -> Self {
        GitletError::Io(e)
    }
}

impl From<serde_json::Error> for GitletError {
    fn from(e: serde_json::Error) -> Self {
        GitletError::Json(e)
    }
}

/// Convenience alias for Results in gitlet.
pub type GitletResult<T> = Result<T, GitletError>;
