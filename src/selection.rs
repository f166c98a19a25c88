/*!
 * Selection state for one project tree
 */

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::FileEntry;

/// Notification sent to listeners after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Tree data changed; `Some(path)` when a single entry changed
    TreeChanged(Option<PathBuf>),
    /// Whether the active search pattern matched anything
    SearchResults(bool),
}

type Listener = Box<dyn FnMut(&SelectionEvent)>;

/// Absolute path -> selected entry.
///
/// A path is present iff it is selected. Iteration is always by path, so the
/// order does not depend on the order of insertion.
#[derive(Default)]
pub struct SelectionStore {
    entries: BTreeMap<PathBuf, FileEntry>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked after every mutation
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Send an event to every listener
    pub fn notify(&mut self, event: SelectionEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Flip the selection of exactly this entry. Returns the new state.
    pub fn toggle(&mut self, entry: &FileEntry) -> bool {
        let selected = if self.entries.remove(&entry.path).is_some() {
            false
        } else {
            let mut entry = entry.clone();
            entry.selected = true;
            self.entries.insert(entry.path.clone(), entry);
            true
        };
        debug!(path = %entry.path.display(), selected, "toggled selection");
        self.notify(SelectionEvent::TreeChanged(Some(entry.path.clone())));
        selected
    }

    /// Mark an entry selected without notifying. Returns true if it was new.
    pub fn insert(&mut self, entry: &FileEntry) -> bool {
        let mut entry = entry.clone();
        entry.selected = true;
        self.entries.insert(entry.path.clone(), entry).is_none()
    }

    /// Unselect a path without notifying. Returns true if it was selected.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drop every selection without notifying
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected entries, sorted by absolute path
    pub fn selected(&self) -> Vec<FileEntry> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut store = SelectionStore::new();
        let entry = FileEntry::new("/p/a.rs", false);

        assert!(store.toggle(&entry));
        assert!(store.is_selected(&entry.path));
        assert!(!store.toggle(&entry));
        assert!(!store.is_selected(&entry.path));
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_does_not_cascade() {
        let mut store = SelectionStore::new();
        store.toggle(&FileEntry::new("/p/src", true));

        assert!(store.is_selected(Path::new("/p/src")));
        assert!(!store.is_selected(Path::new("/p/src/lib.rs")));
        assert!(!store.is_selected(Path::new("/p")));
    }

    #[test]
    fn test_selected_is_sorted_by_path() {
        let mut store = SelectionStore::new();
        store.insert(&FileEntry::new("/p/z.rs", false));
        store.insert(&FileEntry::new("/p/a", true));
        store.insert(&FileEntry::new("/p/m.rs", false));

        let paths: Vec<_> = store.selected().into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("/p/a"),
                PathBuf::from("/p/m.rs"),
                PathBuf::from("/p/z.rs")
            ]
        );
        assert!(store.selected().iter().all(|e| e.selected));
    }

    #[test]
    fn test_listeners_are_notified() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut store = SelectionStore::new();
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let entry = FileEntry::new("/p/a.rs", false);
        store.toggle(&entry);
        store.notify(SelectionEvent::SearchResults(true));

        assert_eq!(
            *events.borrow(),
            vec![
                SelectionEvent::TreeChanged(Some(PathBuf::from("/p/a.rs"))),
                SelectionEvent::SearchResults(true),
            ]
        );
    }
}
