//! Commits — immutable snapshots of the tracked tree.
//!
//! A commit records a file map (path → blob id), a message, a
//! timestamp, and up to two parent ids. Its own id is the SHA-1 of its
//! content, so identical content always yields the identical id.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::hash;

/// The message that marks the root commit of every repository.
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// A single commit record.
///
/// `files` is a `BTreeMap` so the serialized form is canonical: field
/// order is fixed by the struct, key order by the map. Ids stay stable
/// across runs for the same logical content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commit {
    /// Unique identifier (hex SHA-1 of the commit's content).
    pub id: String,
    /// Commit message.
    pub message: String,
    /// When this commit was created.
    pub timestamp: DateTime<Utc>,
    /// Parent commit id (None only for the initial commit).
    pub parent: Option<String>,
    /// Second parent id (present iff this is a merge commit).
    pub second_parent: Option<String>,
    /// Map of tracked path → blob id.
    pub files: BTreeMap<String, String>,
}

impl Commit {
    /// Create a new commit and compute its content hash.
    ///
    /// The `id` field is set to the SHA-1 over the message, the
    /// timestamp's textual form, and the commit's JSON representation
    /// (with `id` empty during hashing). A commit whose message is
    /// exactly `initial commit` gets the epoch timestamp, which makes
    /// the root commit's id reproducible across fresh repositories.
    pub fn new(
        message: String,
        parent: Option<String>,
        second_parent: Option<String>,
        files: BTreeMap<String, String>,
    ) -> Self {
        let timestamp = if message == INITIAL_COMMIT_MESSAGE {
            DateTime::UNIX_EPOCH
        } else {
            Utc::now()
        };

        let mut commit = Commit {
            id: String::new(),
            message,
            timestamp,
            parent,
            second_parent,
            files,
        };

        let record =
            serde_json::to_string(&commit).expect("commit serialization should not fail");
        commit.id = hash::hash_commit(
            &commit.message,
            &commit.timestamp.to_rfc3339(),
            record.as_bytes(),
        );
        commit
    }

    /// The root commit: empty tree, no parents, fixed epoch timestamp.
    pub fn initial() -> Self {
        Commit::new(INITIAL_COMMIT_MESSAGE.to_string(), None, None, BTreeMap::new())
    }

    /// True if this commit has two parents.
    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    /// The blob id recorded for `path`, if this commit tracks it.
    pub fn blob_id(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// True if this commit tracks `path`.
    pub fn tracks(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Render the timestamp for `log` output, local time.
    ///
    /// Format: `EEE MMM d HH:mm:ss yyyy Z`, e.g.
    /// `Thu Jan 1 00:00:00 1970 +0000`.
    pub fn format_date(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_commit_shape() {
        let c = Commit::initial();
        assert_eq!(c.message, INITIAL_COMMIT_MESSAGE);
        assert_eq!(c.timestamp, DateTime::UNIX_EPOCH);
        assert!(c.parent.is_none());
        assert!(c.second_parent.is_none());
        assert!(c.files.is_empty());
        assert_eq!(c.id.len(), 40);
    }

    #[test]
    fn test_initial_commit_id_reproducible() {
        assert_eq!(Commit::initial().id, Commit::initial().id);
    }

    #[test]
    fn test_epoch_timestamp_is_keyed_on_message() {
        let c = Commit::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            Some("a".repeat(40)),
            None,
            BTreeMap::new(),
        );
        assert_eq!(c.timestamp, DateTime::UNIX_EPOCH);

        let d = Commit::new("something else".to_string(), None, None, BTreeMap::new());
        assert_ne!(d.timestamp, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_id_changes_with_files() {
        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), "0".repeat(40));
        let c1 = Commit::new(INITIAL_COMMIT_MESSAGE.to_string(), None, None, files);
        let c2 = Commit::initial();
        assert_ne!(c1.id, c2.id);
    }

    #[test]
    fn test_merge_detection() {
        let plain = Commit::initial();
        assert!(!plain.is_merge());

        let merge = Commit::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            Some("a".repeat(40)),
            Some("b".repeat(40)),
            BTreeMap::new(),
        );
        assert!(merge.is_merge());
    }

    #[test]
    fn test_json_round_trip_preserves_id() {
        let c = Commit::initial();
        let json = serde_json::to_string_pretty(&c).unwrap();
        let back: Commit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, c.id);
        assert_eq!(back.timestamp, c.timestamp);
    }

    #[test]
    fn test_epoch_date_rendering() {
        let c = Commit::initial();
        let rendered = c.format_date();
        // Local-timezone render of the epoch; the year and the numeric
        // offset are always present in this format.
        assert!(rendered.contains("19"));
        assert!(rendered.contains('+') || rendered.contains('-'));
    }
}
