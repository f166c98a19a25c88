/*!
 * Integration tests driving the code-exporter binary
 */

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn setup_project() -> TempDir {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();

    let mut main = File::create(root.join("src/main.rs")).unwrap();
    writeln!(main, "fn main() {{}}").unwrap();
    let mut readme = File::create(root.join("README.md")).unwrap();
    writeln!(readme, "# Demo").unwrap();
    let mut dep = File::create(root.join("node_modules/dep/index.js")).unwrap();
    writeln!(dep, "module.exports = {{}};").unwrap();

    temp_dir
}

// Keep the user's own settings file out of the run
fn exporter(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_code-exporter"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    cmd
}

fn run(config_home: &Path, args: &[&str]) -> Output {
    exporter(config_home).args(args).output().unwrap()
}

#[test]
fn test_stdout_export() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();

    let output = run(
        home.path(),
        &[&root, "src", "README.md", "--stdout", "--lang", "rs=rust"],
    );
    assert!(output.status.success());

    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.starts_with("### Relative Code\n\n#### Relative Directory Structure\n\n```\n"));
    assert!(markdown.contains("├── README.md\n└── src\n    └── main.rs\n"));
    assert!(markdown.contains("##### src/main.rs\n\n```rust\nfn main() {}\n```\n\n"));
    assert!(markdown.contains("##### README.md\n\n```plaintext\n# Demo\n```\n\n"));
    assert!(!project.path().join("exported-code.md").exists());
}

#[test]
fn test_select_root_by_current_dir() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = fs::canonicalize(project.path()).unwrap();
    let root_arg = root.to_string_lossy().to_string();

    let output = run(home.path(), &[&root_arg, ".", "--stdout", "--lang", "rs=rust"]);
    assert!(output.status.success());

    let markdown = String::from_utf8_lossy(&output.stdout);
    let expected = format!(
        "### Relative Code\n\n\
         #### Relative Directory Structure\n\n\
         ```\n{}\n├── README.md\n└── src\n    └── main.rs\n```\n\n\
         #### File Contents\n\n\
         ##### README.md\n\n```plaintext\n# Demo\n```\n\n\
         ##### src/main.rs\n\n```rust\nfn main() {{}}\n```\n\n",
        root.display()
    );
    assert_eq!(markdown, expected);
}

#[test]
fn test_stdout_ignores_missing_output_directory() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();
    fs::write(
        project.path().join(".code-exporter.json"),
        r#"{"outputPath": "/no/such/dir/export.md"}"#,
    )
    .unwrap();

    let output = run(home.path(), &[&root, "README.md", "--stdout"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("##### README.md"));

    // writing to that location still fails up front
    let output = run(home.path(), &[&root, "README.md"]);
    assert!(!output.status.success());
}

#[test]
fn test_default_output_file() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();

    let output = run(home.path(), &[&root, "--all"]);
    assert!(output.status.success());

    let written = fs::read_to_string(project.path().join("exported-code.md")).unwrap();
    assert!(written.contains("##### src/main.rs"));
    assert!(!written.contains("node_modules"));
}

#[test]
fn test_empty_selection_fails_without_writing() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();

    let output = run(home.path(), &[&root]);
    assert!(!output.status.success());
    assert!(!project.path().join("exported-code.md").exists());
}

#[test]
fn test_list_shows_selection_markers() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();

    let output = run(home.path(), &[&root, "README.md", "--list"]);
    assert!(output.status.success());

    let listing = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = listing.lines().skip(1).collect();
    assert_eq!(lines, ["[ ] src/", "[x] README.md"]);
}

#[test]
fn test_project_settings_file() {
    let project = setup_project();
    let home = tempdir().unwrap();
    let root = project.path().to_string_lossy().to_string();
    fs::write(
        project.path().join(".code-exporter.json"),
        r#"{"defaultLanguageMap": {".md": "markdown"}, "outputPath": ""}"#,
    )
    .unwrap();

    let output = run(home.path(), &[&root, "--pattern", "*.md", "--stdout"]);
    assert!(output.status.success());

    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.contains("##### README.md\n\n```markdown\n"));
    assert!(!markdown.contains("##### src/main.rs"));
}

#[test]
#[ignore] // This test requires tmux to be running and is ignored by default
          // To run this test manually use: cargo test --test cli_integration -- --ignored
fn test_clip_flag() {
    if env::var("TMUX").is_err() {
        return;
    }

    let project = setup_project();
    let root = project.path().to_string_lossy().to_string();
    let output_file = project.path().join("out.md");

    let status = Command::new(env!("CARGO_BIN_EXE_code-exporter"))
        .args([&root, "--all", "--clip", "-o", &output_file.to_string_lossy()])
        .status()
        .unwrap();
    assert!(status.success());

    let markdown = fs::read_to_string(&output_file).unwrap();
    let clipboard_output = Command::new("tmux").args(["show-buffer"]).output().unwrap();
    assert_eq!(markdown, String::from_utf8_lossy(&clipboard_output.stdout));
}
