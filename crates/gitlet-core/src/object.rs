//! Content-addressable object store.
//!
//! Blobs live at `.gitlet/blobs/<id>` as raw bytes; commits live at
//! `.gitlet/commits/<id>` as JSON records. Both are keyed by hex SHA-1
//! and are written once, never mutated, never deleted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::commit::Commit;
use crate::error::{GitletError, GitletResult};
use crate::fsutil::plain_file_names;
use crate::hash::hash_bytes;

/// The object store manages content-addressable storage on disk.
pub struct ObjectStore {
    blobs_dir: PathBuf,
    commits_dir: PathBuf,
}

impl ObjectStore {
    /// Create an ObjectStore rooted at the metadata directory.
    pub fn new(gitlet_dir: &Path) -> Self {
        Self {
            blobs_dir: gitlet_dir.join("blobs"),
            commits_dir: gitlet_dir.join("commits"),
        }
    }

    /// Store blob bytes and return their content hash.
    ///
    /// Idempotent: if a blob with the same content already exists this
    /// is a no-op that returns the existing hash.
    pub fn put_blob(&self, data: &[u8]) -> GitletResult<String> {
        let id = hash_bytes(data);
        let path = self.blobs_dir.join(&id);
        if !path.exists() {
            fs::write(&path, data)?;
        }
        Ok(id)
    }

    /// Retrieve blob bytes by id.
    pub fn get_blob(&self, id: &str) -> GitletResult<Vec<u8>> {
        let path = self.blobs_dir.join(id);
        if !path.exists() {
            return Err(GitletError::ObjectNotFound(id.to_string()));
        }
        Ok(fs::read(&path)?)
    }

    /// Persist a commit record under its id.
    pub fn put_commit(&self, commit: &Commit) -> GitletResult<()> {
        let json = serde_json::to_string_pretty(commit)?;
        fs::write(self.commits_dir.join(&commit.id), json)?;
        Ok(())
    }

    /// Load a commit record by its full id.
    pub fn get_commit(&self, id: &str) -> GitletResult<Commit> {
        let path = self.commits_dir.join(id);
        if !path.exists() {
            return Err(GitletError::ObjectNotFound(id.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        let commit: Commit = serde_json::from_str(&data)?;
        Ok(commit)
    }

    /// Resolve a commit id prefix to a full id.
    ///
    /// Returns the first match in sorted enumeration order, or `None`
    /// when no stored id starts with `prefix`.
    pub fn resolve_prefix(&self, prefix: &str) -> GitletResult<Option<String>> {
        for id in self.list_commit_ids()? {
            if id.starts_with(prefix) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Enumerate every stored commit id, sorted.
    pub fn list_commit_ids(&self) -> GitletResult<Vec<String>> {
        plain_file_names(&self.commits_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> ObjectStore {
        fs::create_dir_all(dir.join("blobs")).unwrap();
        fs::create_dir_all(dir.join("commits")).unwrap();
        ObjectStore::new(dir)
    }

    #[test]
    fn test_blob_store_and_retrieve() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let id = store.put_blob(b"hello world").unwrap();
        assert_eq!(id.len(), 40);
        assert_eq!(store.get_blob(&id).unwrap(), b"hello world");
    }

    #[test]
    fn test_blob_put_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let h1 = store.put_blob(b"same content").unwrap();
        let h2 = store.put_blob(b"same content").unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_blob_missing() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(matches!(
            store.get_blob(&"0".repeat(40)),
            Err(GitletError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_commit_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), "1".repeat(40));
        let commit = Commit::new("snapshot".to_string(), None, None, files);
        store.put_commit(&commit).unwrap();

        let loaded = store.get_commit(&commit.id).unwrap();
        assert_eq!(loaded.id, commit.id);
        assert_eq!(loaded.message, "snapshot");
        assert_eq!(loaded.blob_id("a.txt"), Some("1".repeat(40).as_str()));
    }

    #[test]
    fn test_resolve_prefix() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let commit = Commit::initial();
        store.put_commit(&commit).unwrap();

        let resolved = store.resolve_prefix(&commit.id[..8]).unwrap();
        assert_eq!(resolved.as_deref(), Some(commit.id.as_str()));
        assert_eq!(store.resolve_prefix("zzzz").unwrap(), None);
    }

    #[test]
    fn test_resolve_prefix_first_in_sorted_order() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        // Fabricate two ids sharing a prefix; resolution picks the
        // lexicographically smaller one.
        fs::write(dir.path().join("commits").join("ab00"), b"{}").unwrap();
        fs::write(dir.path().join("commits").join("ab01"), b"{}").unwrap();
        let resolved = store.resolve_prefix("ab").unwrap();
        assert_eq!(resolved.as_deref(), Some("ab00"));
    }

    #[test]
    fn test_list_commit_ids_sorted() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let c1 = Commit::initial();
        let c2 = Commit::new("next".to_string(), Some(c1.id.clone()), None, BTreeMap::new());
        store.put_commit(&c1).unwrap();
        store.put_commit(&c2).unwrap();

        let ids = store.list_commit_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.windows(2).all(|w| w[0] <= w[1]));
    }
}
