//! Working-tree inspection for the `status` command.
//!
//! Compares the top-level working files against the HEAD commit and the
//! staging area to find unstaged modifications and untracked files. The
//! metadata area itself is never part of the working tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::GitletResult;
use crate::hash::hash_bytes;
use crate::stage::StagingArea;

/// Everything `status` reports, sections pre-sorted.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// All branch names, sorted.
    pub branches: Vec<String>,
    /// The branch HEAD names.
    pub current_branch: String,
    /// Paths staged for addition.
    pub staged: Vec<String>,
    /// Paths staged for removal.
    pub removed: Vec<String>,
    /// Entries suffixed ` (modified)` or ` (deleted)`.
    pub modifications: Vec<String>,
    /// Working files tracked by neither HEAD nor the staging area.
    pub untracked: Vec<String>,
}

/// The regular files at the top level of the working directory, sorted.
///
/// Directories (including `.gitlet`) are skipped; gitlet tracks a flat
/// namespace of plain files.
pub fn working_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            files.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    files.sort();
    files
}

/// Tracked or staged paths whose working-tree state diverges without
/// being staged, each suffixed ` (modified)` or ` (deleted)`.
///
/// Paths staged for removal are never listed here; their disappearance
/// is already recorded under Removed Files.
pub fn modifications_not_staged(
    root: &Path,
    head_files: &BTreeMap<String, String>,
    stage: &StagingArea,
) -> GitletResult<Vec<String>> {
    let mut entries = Vec::new();

    for (path, head_blob) in head_files {
        if stage.is_removed(path) {
            continue;
        }
        let on_disk = root.join(path);
        if on_disk.exists() {
            let current = hash_bytes(&fs::read(&on_disk)?);
            if current != *head_blob && !stage.is_added(path) {
                entries.push(format!("{path} (modified)"));
            }
        } else {
            entries.push(format!("{path} (deleted)"));
        }
    }

    for (path, staged_blob) in &stage.added {
        let on_disk = root.join(path);
        if !on_disk.exists() {
            entries.push(format!("{path} (deleted)"));
        } else {
            let current = hash_bytes(&fs::read(&on_disk)?);
            if current != *staged_blob {
                entries.push(format!("{path} (modified)"));
            }
        }
    }

    entries.sort();
    Ok(entries)
}

/// Working files tracked by neither HEAD nor the staging area's
/// additions.
pub fn untracked_files(
    root: &Path,
    head_files: &BTreeMap<String, String>,
    stage: &StagingArea,
) -> Vec<String> {
    working_files(root)
        .into_iter()
        .filter(|path| !head_files.contains_key(path) && !stage.is_added(path))
        .collect()
}
