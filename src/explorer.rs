/*!
 * Project explorer: the selection store bound to a root and a walker
 */

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::selection::{SelectionEvent, SelectionStore};
use crate::types::{relative_path, FileEntry};
use crate::walker::TreeWalker;

static SEARCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\.([^./\\*?\s]+)$").expect("search pattern regex is valid"));

/// An active `*.<ext>` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    extension: String,
}

impl SearchPattern {
    /// Parse `*.<ext>`; anything else yields `None`
    pub fn parse(pattern: &str) -> Option<Self> {
        SEARCH_PATTERN.captures(pattern.trim()).map(|caps| Self {
            extension: caps[1].to_lowercase(),
        })
    }

    /// Extension without the dot, lowercase
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches(&self, entry: &FileEntry) -> bool {
        entry.extension().as_deref() == Some(self.extension.as_str())
    }
}

/// Selection over one project tree
#[derive(Debug)]
pub struct Explorer {
    config: Config,
    walker: TreeWalker,
    selection: SelectionStore,
    search: Option<SearchPattern>,
}

impl Explorer {
    /// Create an explorer with an empty selection
    pub fn new(config: Config) -> Self {
        let walker = TreeWalker::new(&config);
        Self {
            config,
            walker,
            selection: SelectionStore::new(),
            search: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn walker(&self) -> &TreeWalker {
        &self.walker
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionEvent) + 'static,
    {
        self.selection.subscribe(listener);
    }

    /// Children of `dir`, or of the root when `dir` is `None`
    pub fn children(&self, dir: Option<&Path>) -> Vec<FileEntry> {
        let dir = dir.unwrap_or(&self.config.root);
        self.walker.list_children(dir, &self.selection)
    }

    /// Look up an entry by path, relative to the root or absolute
    pub fn entry(&self, path: impl AsRef<Path>) -> Result<FileEntry> {
        let path = self.resolve(path.as_ref());
        if !path.starts_with(&self.config.root) {
            return Err(ExportError::InvalidArgument(format!(
                "{} is outside the project root {}",
                path.display(),
                self.config.root.display()
            )));
        }
        if !path.exists() {
            return Err(ExportError::PathNotFound(path.display().to_string()));
        }
        let mut entry = FileEntry::from_path(path);
        entry.selected = self.selection.is_selected(&entry.path);
        Ok(entry)
    }

    /// Flip the selection of one entry. Returns the new state.
    pub fn toggle(&mut self, entry: &FileEntry) -> bool {
        self.selection.toggle(entry)
    }

    /// Toggle an entry given by path
    pub fn toggle_path(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let entry = self.entry(path)?;
        Ok(self.toggle(&entry))
    }

    /// Select an entry given by path, leaving it selected if it already is
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> Result<FileEntry> {
        let entry = self.entry(path)?;
        if !entry.selected {
            self.toggle(&entry);
        }
        Ok(entry)
    }

    /// Select every visible entry under the root
    pub fn select_all(&mut self) {
        let mut visited = Vec::new();
        self.walker
            .visit(&self.config.root, &self.selection, &mut |entry| {
                visited.push(entry.clone())
            });
        for entry in &visited {
            self.selection.insert(entry);
        }
        info!(count = visited.len(), "selected all entries");
        self.selection.notify(SelectionEvent::TreeChanged(None));
    }

    /// Empty the selection
    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.selection.notify(SelectionEvent::TreeChanged(None));
    }

    /// Ask listeners to re-read the tree
    pub fn refresh(&mut self) {
        self.selection.notify(SelectionEvent::TreeChanged(None));
    }

    /// Currently active search pattern
    pub fn search_pattern(&self) -> Option<&SearchPattern> {
        self.search.as_ref()
    }

    /// Set or clear the `*.<ext>` search pattern.
    ///
    /// Setting it scans the whole visible tree and selects every matching
    /// file. Clearing it keeps the selection. Returns whether anything
    /// matched.
    pub fn set_search_pattern(&mut self, pattern: &str) -> Result<bool> {
        if pattern.trim().is_empty() {
            self.search = None;
            self.selection.notify(SelectionEvent::SearchResults(false));
            return Ok(false);
        }

        let search = SearchPattern::parse(pattern)
            .ok_or_else(|| ExportError::InvalidPattern(pattern.to_string()))?;

        let mut matches = Vec::new();
        self.walker
            .visit(&self.config.root, &self.selection, &mut |entry| {
                if !entry.is_dir && search.matches(entry) {
                    matches.push(entry.clone());
                }
            });
        for entry in &matches {
            self.selection.insert(entry);
        }

        let found = !matches.is_empty();
        debug!(pattern, found = matches.len(), "applied search pattern");
        self.search = Some(search);
        self.selection.notify(SelectionEvent::TreeChanged(None));
        self.selection.notify(SelectionEvent::SearchResults(found));
        Ok(found)
    }

    /// Selected entries, sorted by path
    pub fn selected(&self) -> Vec<FileEntry> {
        self.selection.selected()
    }

    /// Path of an entry relative to the root
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        relative_path(path, &self.config.root)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.config.root.join(path))
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
