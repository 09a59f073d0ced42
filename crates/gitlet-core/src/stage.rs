//! The staging area — pending additions and removals.
//!
//! Tracks what the next commit will change relative to HEAD. Stored as
//! JSON at `.gitlet/staging_area`. A path is staged for addition XOR
//! staged for removal XOR neither; the mutators uphold that invariant.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GitletResult;
use crate::fsutil::atomic_write;

/// Pending changes between HEAD and the next commit.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StagingArea {
    /// Path → blob id of the intended post-commit content.
    pub added: BTreeMap<String, String>,
    /// Paths to be deleted by the next commit.
    pub removed: BTreeSet<String>,
}

impl StagingArea {
    /// Load the staging area from disk, or return an empty one.
    pub fn load(path: &Path) -> GitletResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        let stage: StagingArea = serde_json::from_str(&data)?;
        Ok(stage)
    }

    /// Save the staging area to disk (atomic: temp + fsync + rename).
    pub fn save(&self, path: &Path) -> GitletResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    /// Stage `path` for addition with the given blob.
    ///
    /// Clears any pending removal of the same path.
    pub fn stage_add(&mut self, path: &str, blob_id: String) {
        self.removed.remove(path);
        self.added.insert(path.to_string(), blob_id);
    }

    /// Stage `path` for removal.
    ///
    /// Clears any pending addition of the same path.
    pub fn stage_remove(&mut self, path: &str) {
        self.added.remove(path);
        self.removed.insert(path.to_string());
    }

    /// Cancel a pending addition. Returns true if one existed.
    pub fn unstage_add(&mut self, path: &str) -> bool {
        self.added.remove(path).is_some()
    }

    /// Cancel a pending removal. Returns true if one existed.
    pub fn unstage_remove(&mut self, path: &str) -> bool {
        self.removed.remove(path)
    }

    /// True if `path` is staged for addition.
    pub fn is_added(&self, path: &str) -> bool {
        self.added.contains_key(path)
    }

    /// True if `path` is staged for removal.
    pub fn is_removed(&self, path: &str) -> bool {
        self.removed.contains(path)
    }

    /// True if nothing is staged in either direction.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Drop every pending change.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }
}
