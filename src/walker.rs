/*!
 * Lazy, one-level directory listing and recursive file expansion
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::filter::PathFilter;
use crate::selection::SelectionStore;
use crate::types::FileEntry;

/// Lists directory contents through the path filter
#[derive(Debug, Clone)]
pub struct TreeWalker {
    filter: PathFilter,
}

impl TreeWalker {
    /// Create a new walker
    pub fn new(config: &Config) -> Self {
        Self {
            filter: PathFilter::from_config(config),
        }
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// List the visible children of `dir`, directories first, then by name.
    ///
    /// A missing directory yields an empty list. Each entry carries the
    /// store's selection flag for its path.
    pub fn list_children(&self, dir: &Path, selection: &SelectionStore) -> Vec<FileEntry> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "directory vanished, no children");
            return Vec::new();
        }

        let mut children: Vec<FileEntry> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(dir = %dir.display(), "skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| self.filter.is_visible(entry.path(), &entry_name(entry)))
            .map(|entry| {
                let mut node = FileEntry::new(entry.path(), entry.file_type().is_dir());
                node.selected = selection.is_selected(&node.path);
                node
            })
            .collect();

        children.sort_by(|a, b| a.tree_order(b));
        children
    }

    /// Every file below `dir`, depth-first, siblings in file name order.
    ///
    /// Only the exclusion rule applies here; excluded directories are not
    /// descended into.
    pub fn collect_files(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            return Vec::new();
        }

        WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.filter.is_excluded(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(dir = %dir.display(), "skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .map(DirEntry::into_path)
            .collect()
    }

    /// Walk every visible entry below `dir` depth-first in tree order,
    /// calling `visit` for each one.
    ///
    /// Each directory is descended into once. A symlink leading back to a
    /// directory already on the walk is reported but not entered.
    pub fn visit<F>(&self, dir: &Path, selection: &SelectionStore, visit: &mut F)
    where
        F: FnMut(&FileEntry),
    {
        let mut seen = HashSet::new();
        if let Ok(real) = fs::canonicalize(dir) {
            seen.insert(real);
        }
        self.visit_inner(dir, selection, visit, &mut seen);
    }

    fn visit_inner<F>(
        &self,
        dir: &Path,
        selection: &SelectionStore,
        visit: &mut F,
        seen: &mut HashSet<PathBuf>,
    ) where
        F: FnMut(&FileEntry),
    {
        for child in self.list_children(dir, selection) {
            visit(&child);
            if !child.is_dir {
                continue;
            }
            match fs::canonicalize(&child.path) {
                Ok(real) => {
                    if seen.insert(real) {
                        self.visit_inner(&child.path, selection, visit, seen);
                    } else {
                        debug!(dir = %child.path.display(), "directory already visited, not descending");
                    }
                }
                Err(e) => {
                    warn!(dir = %child.path.display(), "cannot resolve directory: {}", e);
                }
            }
        }
    }
}

fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().to_string()
}
