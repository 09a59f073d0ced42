//! The merge engine: split-point discovery and per-file resolution.
//!
//! A merge compares three commits — the split point (latest common
//! ancestor), the current branch tip, and the other branch tip — and
//! decides each file's fate from the per-side blob ids alone.
//! [`Repository::merge`](crate::repo::Repository::merge) applies the
//! decisions to the working tree and staging area.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::commit::Commit;
use crate::error::{GitletError, GitletResult};
use crate::object::ObjectStore;

/// How a `merge` invocation concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch was behind the other; its pointer advanced
    /// with no merge commit.
    FastForwarded,
    /// The other branch is an ancestor of the current one; nothing to do.
    AlreadyAncestor,
    /// A merge commit was created.
    Merged {
        /// Id of the new two-parent commit.
        commit_id: String,
        /// Paths that received conflict markers, sorted.
        conflicts: Vec<String>,
    },
}

/// What to do with one path during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both sides changed the file since the split; synthesize conflict
    /// markers, stage the result.
    Conflict,
    /// Take the other side's blob: write it and stage the addition.
    TakeOther,
    /// Stage the path for removal and delete the working copy.
    Remove,
    /// Delete the working copy; nothing staged.
    DeleteLocal,
    /// Leave the current side's state untouched.
    Keep,
}

/// Decide a path's fate from its blob ids at the split point, the
/// current tip, and the other tip.
///
/// A side counts as "changed" only when the split tracked the path, the
/// side still tracks it, and the blobs differ — a deletion is not a
/// change under this definition. The rows are checked in order and the
/// first match wins.
pub fn resolve(
    split: Option<&str>,
    current: Option<&str>,
    other: Option<&str>,
) -> Resolution {
    let curr_changed = matches!((split, current), (Some(s), Some(c)) if c != s);
    let other_changed = matches!((split, other), (Some(s), Some(o)) if o != s);

    if curr_changed && other_changed {
        Resolution::Conflict
    } else if split.is_some() && current.is_some() && other.is_none() {
        Resolution::Remove
    } else if split.is_none() && current.is_none() && other.is_some() {
        Resolution::TakeOther
    } else if split.is_some() && !curr_changed && other_changed {
        Resolution::TakeOther
    } else if split.is_some() && !curr_changed && current.is_none() && other.is_none() {
        Resolution::DeleteLocal
    } else {
        Resolution::Keep
    }
}

/// Synthesize the conflict-marker bytes for one path.
///
/// Marker line, current content verbatim, `=======`, other content
/// verbatim, closing marker. No newlines are inserted around the
/// contents; an absent side contributes nothing.
pub fn conflict_bytes(current: &[u8], other: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(current.len() + other.len() + 32);
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(current);
    out.extend_from_slice(b"=======\n");
    out.extend_from_slice(other);
    out.extend_from_slice(b">>>>>>>\n");
    out
}

/// Find the split point: the latest common ancestor of two tips.
///
/// Breadth-first from both tips at once, the other tip enqueued first.
/// The first commit dequeued twice is the answer. Merge commits enqueue
/// both parents. Commit loads are cached for the invocation so shared
/// history is read once.
pub fn split_point(
    objects: &ObjectStore,
    current: &Commit,
    other: &Commit,
) -> GitletResult<Commit> {
    let mut queue: VecDeque<Commit> = VecDeque::new();
    queue.push_back(other.clone());
    queue.push_back(current.clone());

    let mut seen: HashSet<String> = HashSet::new();
    let mut cache: HashMap<String, Commit> = HashMap::new();

    while let Some(commit) = queue.pop_front() {
        if !seen.insert(commit.id.clone()) {
            return Ok(commit);
        }
        for parent_id in commit.parent.iter().chain(commit.second_parent.iter()) {
            let parent = match cache.get(parent_id) {
                Some(cached) => cached.clone(),
                None => {
                    let loaded = objects.get_commit(parent_id)?;
                    cache.insert(parent_id.clone(), loaded.clone());
                    loaded
                }
            };
            queue.push_back(parent);
        }
    }

    // Unreachable for well-formed repositories: every branch descends
    // from the initial commit.
    Err(GitletError::Other(
        "branches share no common ancestor".to_string(),
    ))
}
