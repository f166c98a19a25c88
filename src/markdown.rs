/*!
 * Markdown assembly and saving for code-exporter
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::tree::TreeRenderer;
use crate::types::{relative_path, ExportDocument, ExportWarning, FileEntry, FileSection};
use crate::walker::TreeWalker;

/// Builds export documents from a selection
pub struct Assembler {
    /// Assembler configuration
    config: Config,
    /// Directory walker used for expansion and live diagrams
    walker: TreeWalker,
    /// Progress bar, advanced once per file
    pub progress: Arc<ProgressBar>,
}

impl Assembler {
    /// Create a new assembler
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        let walker = TreeWalker::new(&config);
        Self {
            config,
            walker,
            progress,
        }
    }

    /// Expand the selection into a deduplicated, ordered list of files.
    ///
    /// Selected files come through as they are. Selected directories are
    /// expanded depth-first. A file reachable twice is listed once, at its
    /// first position.
    pub fn resolve_files(&self, selected: &[FileEntry]) -> Vec<PathBuf> {
        let mut seen = std::collections::HashSet::new();
        let mut files = Vec::new();

        for entry in selected {
            let expanded = if entry.is_dir {
                self.walker.collect_files(&entry.path)
            } else {
                vec![entry.path.clone()]
            };
            for file in expanded {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        files
    }

    /// Build the export document for `selected`
    pub fn generate(&self, selected: &[FileEntry]) -> Result<ExportDocument> {
        if selected.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let files = self.resolve_files(selected);
        debug!(
            selected = selected.len(),
            files = files.len(),
            "resolved selection"
        );
        self.progress.set_length(files.len() as u64);

        let renderer = TreeRenderer::new(&self.config.root, &self.walker);
        let tree = renderer.render(selected, &files, self.config.tree_style);

        let mut sections = Vec::with_capacity(files.len());
        let mut warnings = Vec::new();
        for path in &files {
            let rel_path = relative_path(path, &self.config.root);
            self.progress
                .set_message(format!("Current file: {}", rel_path.display()));

            let content = match fs::read_to_string(path) {
                Ok(content) => content.trim_end().to_string(),
                Err(e) => {
                    warn!(path = %path.display(), "error reading file: {}", e);
                    warnings.push(ExportWarning {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    String::new()
                }
            };

            sections.push(FileSection {
                relative_path: rel_path.to_string_lossy().to_string(),
                language: self.config.language_for(path).to_string(),
                content,
            });
            self.progress.inc(1);
        }

        Ok(ExportDocument {
            root: self.config.root.clone(),
            tree,
            files: sections,
            warnings,
        })
    }

    /// Build the Markdown text for `selected`
    pub fn generate_markdown(&self, selected: &[FileEntry]) -> Result<String> {
        Ok(self.generate(selected)?.to_markdown())
    }
}

impl ExportDocument {
    /// Render the document with the fixed section headings
    pub fn to_markdown(&self) -> String {
        let mut markdown = String::from("### Relative Code\n\n");

        markdown.push_str("#### Relative Directory Structure\n\n```\n");
        markdown.push_str(&self.tree);
        markdown.push_str("```\n\n");

        markdown.push_str("#### File Contents\n\n");
        for file in &self.files {
            markdown.push_str(&format!(
                "##### {}\n\n```{}\n{}\n```\n\n",
                file.relative_path, file.language, file.content
            ));
        }

        markdown
    }
}

/// Write `content` verbatim as UTF-8 to `path`
pub fn save_markdown(content: &str, path: &Path) -> Result<()> {
    fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = content.len(), "wrote export");
    Ok(())
}
