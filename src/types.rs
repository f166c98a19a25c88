/*!
 * Core types and data structures for code-exporter
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One filesystem object shown in the project tree.
///
/// The absolute path is the identity: two entries with the same path are the
/// same logical node, even when created by separate listings.
#[derive(Debug, Clone, Eq)]
pub struct FileEntry {
    /// Absolute path
    pub path: PathBuf,
    /// Display name (basename)
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Selection flag as it was when the entry was listed
    pub selected: bool,
}

impl FileEntry {
    /// Create an unselected entry, deriving the display name from the path
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            is_dir,
            selected: false,
        }
    }

    /// Create an entry by inspecting the filesystem
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_dir = path.is_dir();
        Self::new(path, is_dir)
    }

    /// Lowercase extension without the dot; always `None` for directories
    pub fn extension(&self) -> Option<String> {
        if self.is_dir {
            return None;
        }
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Path relative to `root`, falling back to the absolute path
    pub fn relative_to(&self, root: &Path) -> PathBuf {
        relative_path(&self.path, root)
    }

    /// Tree view ordering: directories first, then by name, then by path
    pub fn tree_order(&self, other: &Self) -> Ordering {
        other
            .is_dir
            .cmp(&self.is_dir)
            .then_with(|| compare_names(&self.name, &other.name))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl std::hash::Hash for FileEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Case-insensitive name comparison, with a case-sensitive tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// `path` relative to `root`, or `path` itself when it lies outside `root`
pub fn relative_path(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// One exported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    /// Path relative to the project root, used as the heading
    pub relative_path: String,
    /// Code fence language tag
    pub language: String,
    /// File content, trailing whitespace trimmed
    pub content: String,
}

/// A file that could not be read during export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportWarning {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Reason the read failed
    pub message: String,
}

/// The finished export: diagram plus file sections, in output order
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// Project root printed above the diagram
    pub root: PathBuf,
    /// Rendered directory diagram, root line included
    pub tree: String,
    /// File sections in resolved order
    pub files: Vec<FileSection>,
    /// Files that were exported with empty content
    pub warnings: Vec<ExportWarning>,
}
