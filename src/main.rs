/*!
 * Command-line interface for code-exporter
 */

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use code_exporter::clipboard;
use code_exporter::config::{Args, Config};
use code_exporter::error::{ExportError, Result};
use code_exporter::explorer::Explorer;
use code_exporter::markdown::{save_markdown, Assembler};
use code_exporter::report::{ExportReport, ReportFormat, Reporter};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(shell) = args.generate {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            "code-exporter",
            &mut io::stdout(),
        );
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ExportError::EmptySelection) => {
            warn!("Please select at least one file or directory to export");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so `--stdout` output stays clean. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args(&args)?;
    config.validate()?;
    debug!(?config, "configuration loaded");

    let mut explorer = Explorer::new(config.clone());
    explorer.subscribe(|event| debug!(?event, "selection changed"));

    if let Some(path) = &args.copy_path {
        let entry = explorer.entry(path)?;
        clipboard::copy_path(&entry.path)?;
        println!("Absolute path copied to clipboard");
        return Ok(());
    }

    if let Some(path) = &args.copy_relative_path {
        let entry = explorer.entry(path)?;
        clipboard::copy_path(&explorer.relative_path(&entry.path))?;
        println!("Relative path copied to clipboard");
        return Ok(());
    }

    if args.all {
        explorer.select_all();
    }

    if let Some(pattern) = &args.pattern {
        if !explorer.set_search_pattern(pattern)? {
            warn!(pattern = pattern.as_str(), "no files matched the search pattern");
        }
    }

    for path in &args.paths {
        explorer.select_path(path)?;
    }

    if let Some(dir) = &args.list {
        let dir = if dir.is_empty() {
            config.root.clone()
        } else {
            explorer.entry(dir)?.path
        };
        print_listing(&explorer, &dir);
        return Ok(());
    }

    export(&args, &config, &mut explorer)
}

/// Print one directory level with selection markers
fn print_listing(explorer: &Explorer, dir: &Path) {
    println!("{}", dir.display());
    for entry in explorer.children(Some(dir)) {
        let marker = if entry.selected { "[x]" } else { "[ ]" };
        let suffix = if entry.is_dir { "/" } else { "" };
        println!("{} {}{}", marker, entry.name, suffix);
    }
}

fn export(args: &Args, config: &Config, explorer: &mut Explorer) -> Result<()> {
    let selected = explorer.selected();
    if selected.is_empty() {
        return Err(ExportError::EmptySelection);
    }
    if !args.stdout {
        config.validate_output()?;
    }

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📦 Exporting");

    let start_time = Instant::now();
    let assembler = Assembler::new(config.clone(), Arc::new(progress.clone()));
    let document = assembler.generate(&selected)?;
    let markdown = document.to_markdown();

    let destination = if args.stdout {
        progress.finish_and_clear();
        print!("{}", markdown);
        "stdout".to_string()
    } else {
        let output = config.resolve_output_path();
        progress.set_message(format!("Writing {}", output.display()));
        save_markdown(&markdown, &output)?;
        progress.finish_and_clear();
        output.display().to_string()
    };

    if args.clip {
        match clipboard::copy_to_clipboard(&markdown) {
            Ok(()) => debug!("document copied to clipboard"),
            Err(e) => warn!("Failed to copy to clipboard: {}", e),
        }
    }

    let duration = start_time.elapsed();
    explorer.deselect_all();

    if !args.stdout {
        let report = ExportReport::from_document(
            &document,
            selected.len(),
            destination,
            duration,
            markdown.len(),
        );
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
