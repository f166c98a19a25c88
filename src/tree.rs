/*!
 * Directory diagram rendering
 *
 * Both styles print the project root on the first line, followed by one line
 * per node using `├── ` / `└── ` markers. Every line ends with a newline.
 */

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::config::TreeStyle;
use crate::selection::SelectionStore;
use crate::types::{relative_path, FileEntry};
use crate::walker::TreeWalker;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Renders the selection as an ASCII tree
pub struct TreeRenderer<'a> {
    root: &'a Path,
    walker: &'a TreeWalker,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(root: &'a Path, walker: &'a TreeWalker) -> Self {
        Self { root, walker }
    }

    /// Render `selected` with the given style. `resolved` is the expanded
    /// file list and is only consulted by the flat style.
    pub fn render(&self, selected: &[FileEntry], resolved: &[PathBuf], style: TreeStyle) -> String {
        match style {
            TreeStyle::Flat => {
                let mut paths: Vec<PathBuf> =
                    selected.iter().map(|entry| entry.path.clone()).collect();
                paths.extend(resolved.iter().cloned());
                render_flat(self.root, &paths)
            }
            TreeStyle::Live => self.render_live(selected),
        }
    }

    /// Print each selected entry as a top-level node and re-list selected
    /// directories through the walker
    pub fn render_live(&self, selected: &[FileEntry]) -> String {
        let mut out = root_line(self.root);
        let mut nodes = selected.to_vec();
        nodes.sort_by(|a, b| a.tree_order(b));
        // Listing flags are irrelevant to the diagram
        let store = SelectionStore::new();
        self.write_live(&nodes, "", &store, &mut out);
        out
    }

    fn write_live(&self, nodes: &[FileEntry], prefix: &str, store: &SelectionStore, out: &mut String) {
        for (i, node) in nodes.iter().enumerate() {
            let is_last = i == nodes.len() - 1;
            push_line(out, prefix, is_last, &node.name);

            if node.is_dir {
                let children = self.walker.list_children(&node.path, store);
                if !children.is_empty() {
                    let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
                    self.write_live(&children, &child_prefix, store, out);
                }
            }
        }
    }
}

/// Segment trie of root-relative paths
#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<String, TrieNode>,
}

impl TrieNode {
    fn insert(&mut self, segments: impl IntoIterator<Item = String>) {
        let mut node = self;
        for segment in segments {
            node = node.children.entry(segment).or_default();
        }
    }

    fn write(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, (name, child)) in self.children.iter().enumerate() {
            let is_last = i == count - 1;
            push_line(out, prefix, is_last, name);
            if !child.children.is_empty() {
                let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
                child.write(&child_prefix, out);
            }
        }
    }
}

/// Build a trie from `paths` (relative to `root`) and print it with children
/// in name order at every level. Paths equal to the root add nothing.
pub fn render_flat(root: &Path, paths: &[PathBuf]) -> String {
    let mut trie = TrieNode::default();
    for path in paths {
        trie.insert(segments(&relative_path(path, root)));
    }

    let mut out = root_line(root);
    trie.write("", &mut out);
    out
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

fn root_line(root: &Path) -> String {
    format!("{}\n", root.display())
}

fn push_line(out: &mut String, prefix: &str, is_last: bool, name: &str) {
    out.push_str(prefix);
    out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
    out.push_str(name);
    out.push('\n');
}
