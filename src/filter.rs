//! Visibility rules for tree entries
//!
//! Exclusion patterns are glob-looking strings that are matched as plain
//! substrings of the full path once `**/` and `/**` are stripped. A fragment
//! therefore also hides paths where it appears inside a longer segment
//! (`node_modules` hides `my_node_modules_backup`).

use std::path::Path;

use crate::config::Config;

/// Decides whether a filesystem entry is shown
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    fragments: Vec<String>,
    include_hidden: bool,
}

impl PathFilter {
    /// Build a filter from an exclusion list and hidden-file policy
    pub fn new(exclude_pattern: &str, include_hidden: bool) -> Self {
        Self {
            fragments: parse_exclude_pattern(exclude_pattern),
            include_hidden,
        }
    }

    /// Build a filter from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.exclude_pattern, config.include_hidden)
    }

    /// Normalized exclusion fragments
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Whether an entry named `entry_name` at `full_path` is visible
    pub fn is_visible(&self, full_path: &Path, entry_name: &str) -> bool {
        if !self.include_hidden && entry_name.starts_with('.') {
            return false;
        }
        !self.is_excluded(full_path)
    }

    /// Whether any exclusion fragment occurs in `full_path`
    pub fn is_excluded(&self, full_path: &Path) -> bool {
        let full_path = full_path.to_string_lossy();
        self.fragments
            .iter()
            .any(|fragment| full_path.contains(fragment.as_str()))
    }
}

/// Split a comma-separated exclusion list into substring fragments
pub fn parse_exclude_pattern(pattern: &str) -> Vec<String> {
    pattern
        .split(',')
        .map(normalize_fragment)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_fragment(pattern: &str) -> &str {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("**/").unwrap_or(pattern);
    pattern.strip_suffix("/**").unwrap_or(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXCLUDE_PATTERN;

    #[test]
    fn test_default_pattern_normalization() {
        assert_eq!(
            parse_exclude_pattern(DEFAULT_EXCLUDE_PATTERN),
            vec!["node_modules".to_string(), ".git".to_string()]
        );
        assert_eq!(
            parse_exclude_pattern(" **/target/** , dist ,,"),
            vec!["target".to_string(), "dist".to_string()]
        );
        assert!(parse_exclude_pattern("").is_empty());
    }

    #[test]
    fn test_hidden_rule() {
        let filter = PathFilter::new("", false);
        assert!(!filter.is_visible(Path::new("/p/.env"), ".env"));
        assert!(filter.is_visible(Path::new("/p/env"), "env"));

        let filter = PathFilter::new("", true);
        assert!(filter.is_visible(Path::new("/p/.env"), ".env"));
    }

    #[test]
    fn test_exclusion_is_substring_match() {
        let filter = PathFilter::new(DEFAULT_EXCLUDE_PATTERN, true);
        assert!(!filter.is_visible(Path::new("/p/node_modules"), "node_modules"));
        assert!(!filter.is_visible(Path::new("/p/web/node_modules/x.js"), "x.js"));
        // Over-matching inside a longer segment is accepted behaviour
        assert!(!filter.is_visible(
            Path::new("/p/my_node_modules_backup"),
            "my_node_modules_backup"
        ));
        // `.git` also hides `.github` and `.gitignore`
        assert!(filter.is_excluded(Path::new("/p/.github/workflows")));
        assert!(filter.is_excluded(Path::new("/p/.gitignore")));
        assert!(!filter.is_excluded(Path::new("/p/src/main.rs")));
    }

    #[test]
    fn test_empty_pattern_excludes_nothing() {
        let filter = PathFilter::new("", false);
        assert!(filter.fragments().is_empty());
        assert!(!filter.is_excluded(Path::new("/p/node_modules/a.js")));
    }

    #[test]
    fn test_broad_fragment_hides_everything_under_it() {
        // A fragment that matches the root path hides the whole project
        let filter = PathFilter::new("/", false);
        assert!(filter.is_excluded(Path::new("/p/src/main.rs")));
    }
}
