/*!
 * Reporting functionality for code-exporter
 *
 * Provides a formatted console summary of an export using the tabled
 * library for clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::ExportDocument;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Path relative to the project root
    pub path: String,
    /// Code fence language tag
    pub language: String,
    /// Number of lines in the exported content
    pub lines: usize,
    /// Number of characters in the exported content
    pub chars: usize,
}

/// Statistics for one export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Where the document went (file path, or `stdout`)
    pub destination: String,
    /// Time taken to build and write the document
    pub duration: Duration,
    /// Number of selected entries before expansion
    pub selected: usize,
    /// Per-file details, in document order
    pub files: Vec<FileReportInfo>,
    /// Number of files exported with empty content
    pub unreadable: usize,
    /// Size of the Markdown document in bytes
    pub document_bytes: usize,
}

impl ExportReport {
    /// Collect report data from a finished document
    pub fn from_document(
        document: &ExportDocument,
        selected: usize,
        destination: impl Into<String>,
        duration: Duration,
        document_bytes: usize,
    ) -> Self {
        let files = document
            .files
            .iter()
            .map(|section| FileReportInfo {
                path: section.relative_path.clone(),
                language: section.language.clone(),
                lines: if section.content.is_empty() {
                    0
                } else {
                    section.content.lines().count()
                },
                chars: section.content.chars().count(),
            })
            .collect();

        Self {
            destination: destination.into(),
            duration,
            selected,
            files,
            unreadable: document.warnings.len(),
            document_bytes,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }

    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|f| f.chars).sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ExportReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, where the file name is
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Export Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "✅ Selected Entries".to_string(),
                value: self.format_number(report.selected),
            },
            SummaryRow {
                key: "📄 Files Exported".to_string(),
                value: self.format_number(report.files.len()),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "📦 Document Size".to_string(),
                value: format!("{} bytes", self.format_number(report.document_bytes)),
            },
        ];

        if report.unreadable > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Unreadable Files".to_string(),
                value: report.unreadable.to_string(),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Language")]
            language: String,

            #[tabled(rename = "Lines")]
            lines: String,
        }

        // Largest files first
        let mut files: Vec<_> = report.files.iter().collect();
        files.sort_by(|a, b| b.chars.cmp(&a.chars).then_with(|| a.path.cmp(&b.path)));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|info| FileRow {
                path: self.format_path(&info.path, 60),
                language: info.language.clone(),
                lines: self.format_number(info.lines),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ExportReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  EXPORT COMPLETE";
        let files_title = if report.files.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  EXPORTED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExportWarning, FileSection};
    use std::path::PathBuf;

    fn document() -> ExportDocument {
        ExportDocument {
            root: PathBuf::from("/p"),
            tree: "/p\n".to_string(),
            files: vec![
                FileSection {
                    relative_path: "src/lib.rs".to_string(),
                    language: "rust".to_string(),
                    content: "fn a() {}\nfn b() {}".to_string(),
                },
                FileSection {
                    relative_path: "blob.bin".to_string(),
                    language: "plaintext".to_string(),
                    content: String::new(),
                },
            ],
            warnings: vec![ExportWarning {
                path: PathBuf::from("/p/blob.bin"),
                message: "stream did not contain valid UTF-8".to_string(),
            }],
        }
    }

    #[test]
    fn test_report_from_document() {
        let report =
            ExportReport::from_document(&document(), 2, "out.md", Duration::from_millis(5), 120);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].lines, 2);
        assert_eq!(report.files[1].lines, 0);
        assert_eq!(report.total_lines(), 2);
        assert_eq!(report.total_chars(), 19);
        assert_eq!(report.unreadable, 1);
    }

    #[test]
    fn test_console_report_mentions_files() {
        let report =
            ExportReport::from_document(&document(), 2, "out.md", Duration::from_millis(5), 120);
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.contains("EXPORTED FILES"));
        assert!(text.contains("src/lib.rs"));
        assert!(text.contains("rust"));
        assert!(text.contains("Unreadable Files"));
    }

    #[test]
    fn test_format_path_truncation() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_path("src/lib.rs", 60), "src/lib.rs");
        assert_eq!(
            reporter.format_path("very/long/directory/name/file.rs", 20),
            ".../name/file.rs"
        );
    }
}
