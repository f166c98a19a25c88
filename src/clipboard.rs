/*!
 * Clipboard support for code-exporter
 *
 * Copies exported documents and entry paths to the system clipboard by piping
 * them into whichever clipboard command the platform provides.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Platforms with distinct clipboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    MacOS,
    Windows,
    Wsl,
    Linux,
    Android,
    Unknown,
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardProvider {
    /// tmux paste buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (native or via WSL)
    Windows,
    /// Termux clipboard
    Termux,
}

const NO_ARGS: &[&str] = &[];
const TMUX_ARGS: &[&str] = &["load-buffer", "-w", "-"];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard", "-in"];
const XSEL_ARGS: &[&str] = &["-b", "-i"];

impl ClipboardProvider {
    fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", TMUX_ARGS),
            Self::Xclip => ("xclip", XCLIP_ARGS),
            Self::Xsel => ("xsel", XSEL_ARGS),
            Self::Wayland => ("wl-copy", NO_ARGS),
            Self::MacOS => ("pbcopy", NO_ARGS),
            Self::Windows => ("clip.exe", NO_ARGS),
            Self::Termux => ("termux-clipboard-set", NO_ARGS),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        execute_clipboard_command(cmd, args, text)
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the clipboard
///
/// Tries each available clipboard mechanism in order of preference and
/// stops at the first one that succeeds.
///
/// # Examples
/// ```no_run
/// use code_exporter::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("### Relative Code") {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let providers = determine_clipboard_providers();
    let mut last_error = ClipboardError::NoClipboardFound;

    for provider in providers {
        match provider.copy_to_clipboard(text) {
            Ok(()) => {
                debug!(?provider, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(e) => {
                debug!(?provider, "clipboard provider failed: {}", e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Copy a path to the clipboard as text
pub fn copy_path(path: &Path) -> Result<()> {
    copy_to_clipboard(&path.to_string_lossy())
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| dir.join(command).is_file()) {
            return true;
        }
    }

    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Spawn `cmd`, write `text` to its stdin and wait for it to finish
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin
            .write_all(text.as_bytes())
            .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

fn get_platform() -> Platform {
    *PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                Platform::Wsl
            } else {
                Platform::Linux
            }
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Unknown
        }
    })
}

/// Clipboard providers to try, in order of preference
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // tmux first when a session is reachable
    if command_exists("tmux") && is_tmux_running() {
        providers.push(ClipboardProvider::Tmux);
    }

    let candidates: &[(&str, ClipboardProvider)] = match get_platform() {
        Platform::MacOS => &[("pbcopy", ClipboardProvider::MacOS)],
        Platform::Windows | Platform::Wsl => &[("clip.exe", ClipboardProvider::Windows)],
        Platform::Linux => &[
            ("wl-copy", ClipboardProvider::Wayland),
            ("xsel", ClipboardProvider::Xsel),
            ("xclip", ClipboardProvider::Xclip),
        ],
        Platform::Android => &[("termux-clipboard-set", ClipboardProvider::Termux)],
        Platform::Unknown => &[],
    };

    providers.extend(
        candidates
            .iter()
            .filter(|(cmd, _)| command_exists(cmd))
            .map(|(_, provider)| *provider),
    );

    providers
}

fn is_tmux_running() -> bool {
    if env::var("TMUX").is_ok() {
        return true;
    }

    Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
