/*!
 * code-exporter - Export selected project files to a single Markdown document
 *
 * This library keeps a selection over a lazily listed project tree and renders
 * that selection as a directory diagram followed by one fenced code block per
 * file.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod markdown;
pub mod report;
pub mod selection;
pub mod tree;
pub mod types;
pub mod walker;


// Re-export main components for easier access
pub use config::{Config, TreeStyle};
pub use error::{ExportError, Result};
pub use explorer::{Explorer, SearchPattern};
pub use filter::PathFilter;
pub use markdown::{save_markdown, Assembler};
pub use report::{ExportReport, FileReportInfo, ReportFormat, Reporter};
pub use selection::{SelectionEvent, SelectionStore};
pub use tree::{render_flat, TreeRenderer};
pub use types::{ExportDocument, ExportWarning, FileEntry, FileSection};
pub use walker::TreeWalker;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
