/*!
 * Configuration handling for code-exporter
 *
 * Settings are layered: built-in defaults, then the user settings file, then
 * the project settings file, then command-line flags.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{ExportError, Result, ResultExt};

/// Default exclusion list, matching what a fresh editor install ships with
pub const DEFAULT_EXCLUDE_PATTERN: &str = "**/node_modules/**,**/.git/**";

/// File name used when no output path is configured
pub const DEFAULT_OUTPUT_FILE: &str = "exported-code.md";

/// Project-level settings file, looked up in the root directory
pub const PROJECT_SETTINGS_FILE: &str = ".code-exporter.json";

/// How the directory diagram is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// Segment trie over the selection and the resolved files, sorted by name
    #[default]
    Flat,
    /// Re-list every selected directory, directories before files
    Live,
}

/// Command-line arguments for code-exporter
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "code-exporter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export selected project files to a single Markdown document",
    long_about = "Selects files and directories from a project tree and exports their contents, together with a directory diagram, into one Markdown document."
)]
pub struct Args {
    /// Project root directory
    #[clap(default_value = ".")]
    pub root: String,

    /// Files or directories to select (relative to the root or absolute)
    pub paths: Vec<String>,

    /// Select every visible file and directory
    #[clap(long)]
    pub all: bool,

    /// Auto-select every visible file matching a `*.<ext>` pattern
    #[clap(long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Output Markdown file (default: <root>/exported-code.md)
    #[clap(short, long)]
    pub output: Option<String>,

    /// Comma-separated exclusion fragments (substring match on the full path)
    #[clap(long)]
    pub exclude_pattern: Option<String>,

    /// Show dot-prefixed files and directories
    #[clap(long)]
    pub include_hidden: bool,

    /// Language tag for an extension, e.g. `--lang py=python` (repeatable)
    #[clap(long = "lang", value_name = "EXT=TAG")]
    pub language_overrides: Vec<String>,

    /// Directory diagram style
    #[clap(long, value_enum)]
    pub tree_style: Option<TreeStyle>,

    /// Settings file to use instead of <root>/.code-exporter.json
    #[clap(long)]
    pub settings: Option<String>,

    /// List the children of a directory with their selection state and exit
    #[clap(long, value_name = "DIR", num_args = 0..=1, default_missing_value = "")]
    pub list: Option<String>,

    /// Print the document to stdout instead of writing a file
    #[clap(long)]
    pub stdout: bool,

    /// Copy output to clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Copy the absolute path of an entry to the clipboard and exit
    #[clap(long, value_name = "PATH")]
    pub copy_path: Option<String>,

    /// Copy the root-relative path of an entry to the clipboard and exit
    #[clap(long, value_name = "PATH")]
    pub copy_relative_path: Option<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,
}

/// On-disk settings, using the same keys as the editor extension
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub exclude_pattern: Option<String>,
    pub include_hidden: Option<bool>,
    pub default_language_map: Option<BTreeMap<String, String>>,
    pub output_path: Option<String>,
    pub tree_style: Option<TreeStyle>,
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings = serde_json::from_str(&raw).map_err(|e| {
            ExportError::Config(format!("{}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(Some(settings))
    }

    /// Location of the per-user settings file
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("code-exporter").join("settings.json"))
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project root
    pub root: PathBuf,

    /// Comma-separated exclusion fragments
    pub exclude_pattern: String,

    /// Whether dot-prefixed entries are visible
    pub include_hidden: bool,

    /// Lowercase extension (without dot) -> code fence language tag
    pub language_map: BTreeMap<String, String>,

    /// Suggested output path; empty means `<root>/exported-code.md`
    pub output_path: String,

    /// Directory diagram style
    pub tree_style: TreeStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude_pattern: DEFAULT_EXCLUDE_PATTERN.to_string(),
            include_hidden: false,
            language_map: BTreeMap::new(),
            output_path: String::new(),
            tree_style: TreeStyle::Flat,
        }
    }
}

impl Config {
    /// Default configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Create configuration from command-line arguments, layering the user
    /// and project settings files underneath the flags
    pub fn from_args(args: &Args) -> Result<Self> {
        let root = fs::canonicalize(&args.root)
            .map_err(|_| ExportError::PathNotFound(args.root.clone()))?;
        let mut config = Self::new(root);

        if let Some(path) = Settings::user_path() {
            if let Some(settings) = Settings::load(&path)? {
                config.apply(settings);
            }
        }

        let project = match &args.settings {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(ExportError::PathNotFound(path.display().to_string()));
                }
                path
            }
            None => config.root.join(PROJECT_SETTINGS_FILE),
        };
        if let Some(settings) = Settings::load(&project)? {
            config.apply(settings);
        }

        if let Some(pattern) = &args.exclude_pattern {
            config.exclude_pattern = pattern.clone();
        }
        if args.include_hidden {
            config.include_hidden = true;
        }
        for entry in &args.language_overrides {
            let (ext, tag) = entry.split_once('=').ok_or_else(|| {
                ExportError::InvalidArgument(format!("expected EXT=TAG, got '{}'", entry))
            })?;
            config.set_language(ext, tag.trim());
        }
        if let Some(output) = &args.output {
            config.output_path = output.clone();
        }
        if let Some(style) = args.tree_style {
            config.tree_style = style;
        }

        Ok(config)
    }

    /// Overlay values present in a settings file
    pub fn apply(&mut self, settings: Settings) {
        if let Some(pattern) = settings.exclude_pattern {
            self.exclude_pattern = pattern;
        }
        if let Some(hidden) = settings.include_hidden {
            self.include_hidden = hidden;
        }
        if let Some(map) = settings.default_language_map {
            for (ext, tag) in map {
                self.set_language(&ext, &tag);
            }
        }
        if let Some(output) = settings.output_path {
            self.output_path = output;
        }
        if let Some(style) = settings.tree_style {
            self.tree_style = style;
        }
    }

    /// Map an extension to a language tag. `.py`, `py` and `PY` are the same key.
    pub fn set_language(&mut self, ext: &str, tag: &str) {
        self.language_map
            .insert(normalize_extension(ext), tag.to_string());
    }

    /// Language tag for a file path, `plaintext` when unmapped
    pub fn language_for(&self, path: &Path) -> &str {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .and_then(|ext| self.language_map.get(&ext))
            .map(String::as_str)
            .unwrap_or("plaintext")
    }

    /// Where the exported document goes
    pub fn resolve_output_path(&self) -> PathBuf {
        if self.output_path.trim().is_empty() {
            self.root.join(DEFAULT_OUTPUT_FILE)
        } else {
            PathBuf::from(&self.output_path)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.root.is_dir(),
            PathNotFound,
            "Project root not found: {}",
            self.root.display()
        );
        Ok(())
    }

    /// Check that the document can be written where it is configured to go
    pub fn validate_output(&self) -> Result<()> {
        let output = self.resolve_output_path();
        if let Some(parent) = output.parent() {
            crate::ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_language_lookup() {
        let mut config = Config::new("/project");
        config.set_language(".py", "python");
        config.set_language("RS", "rust");

        assert_eq!(config.language_for(Path::new("/project/a.py")), "python");
        assert_eq!(config.language_for(Path::new("/project/A.PY")), "python");
        assert_eq!(config.language_for(Path::new("/project/lib.rs")), "rust");
        assert_eq!(config.language_for(Path::new("/project/notes.txt")), "plaintext");
        assert_eq!(config.language_for(Path::new("/project/Makefile")), "plaintext");
        assert_eq!(config.language_for(Path::new("/project/.bashrc")), "plaintext");
    }

    #[test]
    fn test_output_path_default() {
        let mut config = Config::new("/project");
        assert_eq!(
            config.resolve_output_path(),
            PathBuf::from("/project/exported-code.md")
        );

        config.output_path = "/tmp/out.md".to_string();
        assert_eq!(config.resolve_output_path(), PathBuf::from("/tmp/out.md"));
    }

    #[test]
    fn test_settings_layering() -> Result<()> {
        let dir = tempdir()?;
        let mut file = fs::File::create(dir.path().join(PROJECT_SETTINGS_FILE))?;
        writeln!(
            file,
            r#"{{"excludePattern": "target", "includeHidden": true,
                "defaultLanguageMap": {{".py": "python"}}, "treeStyle": "live"}}"#
        )?;

        let args = Args::parse_from([
            "code-exporter",
            dir.path().to_str().unwrap_or("."),
            "--lang",
            "rs=rust",
            "--exclude-pattern",
            "build",
        ]);
        let config = Config::from_args(&args)?;

        // flag beats file
        assert_eq!(config.exclude_pattern, "build");
        assert!(config.include_hidden);
        assert_eq!(config.tree_style, TreeStyle::Live);
        assert_eq!(config.language_map.get("py").map(String::as_str), Some("python"));
        assert_eq!(config.language_map.get("rs").map(String::as_str), Some("rust"));
        Ok(())
    }

    #[test]
    fn test_malformed_settings_is_config_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(PROJECT_SETTINGS_FILE), "{ not json")?;

        let err = Settings::load(&dir.path().join(PROJECT_SETTINGS_FILE)).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
        assert!(Settings::load(&dir.path().join("missing.json"))?.is_none());
        Ok(())
    }

    #[test]
    fn test_validate_missing_root() {
        let config = Config::new("/definitely/not/here");
        assert!(matches!(config.validate(), Err(ExportError::PathNotFound(_))));
    }

    #[test]
    fn test_output_directory_checked_separately() -> Result<()> {
        let dir = tempdir()?;
        let mut config = Config::new(dir.path());
        config.output_path = "/no/such/dir/export.md".to_string();

        config.validate()?;
        assert!(matches!(config.validate_output(), Err(ExportError::Config(_))));

        config.output_path = String::new();
        config.validate_output()?;
        Ok(())
    }

    #[test]
    fn test_tree_style_names() {
        assert_eq!(TreeStyle::Flat.to_string(), "flat");
        assert_eq!("live".parse::<TreeStyle>().ok(), Some(TreeStyle::Live));
    }
}
