//! Leaf-folder discovery.
//!
//! [`FolderWalker`] walks a directory tree and yields one sorted path
//! collection per *leaf folder*: a directory whose contents are files of the
//! requested extension rather than further subdirectories. Traversal is lazy
//! and restartable; constructing a new walker always performs a fresh walk.
//!
//! The folder-type heuristic is deliberate and documented: within each
//! directory the children are sorted lexicographically, and the **first**
//! child decides how the whole directory is treated. A directory first child
//! means every child is assumed to be a directory and each is recursed into;
//! a file first child of the requested extension means the full sorted child
//! list is yielded as one collection. Mixed-content directories and leaf
//! folders whose first sorted entry carries a different extension yield
//! nothing. Unreadable directories are skipped silently, so a caller
//! observes an empty traversal rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use timelapse::FolderWalker;
//!
//! for paths in FolderWalker::new("/photos", "jpg") {
//!     println!("leaf folder with {} images", paths.len());
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

/// A lazy, depth-first iterator over leaf folders.
///
/// Yields `Vec<PathBuf>` items, each the lexicographically sorted file list
/// of one leaf folder. Subdirectories are visited in sorted order, so the
/// sequence of yielded collections is deterministic for a given tree.
pub struct FolderWalker {
    /// Requested extension, lowercased, without a leading dot.
    extension: String,
    /// Directories still to visit, popped LIFO. Children are pushed in
    /// reverse sorted order so the walk stays lexicographic depth-first.
    pending: Vec<PathBuf>,
}

impl FolderWalker {
    /// Create a walker rooted at `root` that looks for files with the
    /// given extension (with or without a leading dot, case-insensitive).
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            pending: vec![root.into()],
        }
    }

    /// List a directory's children, sorted lexicographically.
    ///
    /// Returns `None` when the directory cannot be read; discovery errors
    /// are a silent skip by policy.
    fn sorted_children(dir: &Path) -> Option<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                debug!("skipping unreadable directory {}: {error}", dir.display());
                return None;
            }
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        children.sort();
        Some(children)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

impl Iterator for FolderWalker {
    type Item = Vec<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(dir) = self.pending.pop() {
            let Some(children) = Self::sorted_children(&dir) else {
                continue;
            };
            let Some(first) = children.first() else {
                // Empty folders yield no collection.
                continue;
            };

            if first.is_dir() {
                // First child decides: treat every child as a directory.
                for child in children.into_iter().rev() {
                    self.pending.push(child);
                }
                continue;
            }

            if self.matches_extension(first) {
                return Some(children);
            }

            debug!(
                "skipping {}: first entry {} does not match extension {}",
                dir.display(),
                first.display(),
                self.extension
            );
        }
        None
    }
}
