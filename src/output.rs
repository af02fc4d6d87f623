//! Delivery of transcribed text to a file, the clipboard or stdout.
//!
//! Clipboard support shells out to pbcopy (macOS), wl-copy (Wayland) or xclip (X11).

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(not(target_os = "macos"))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
    ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
];

/// Where a finished transcription goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    File(PathBuf),
    Clipboard,
    #[default]
    Stdout,
}

impl OutputTarget {
    /// Resolves the `-c`/`-o` flags. A file wins over the clipboard.
    pub fn from_flags(clipboard: bool, output: Option<String>) -> Self {
        match output {
            Some(path) => Self::File(PathBuf::from(path)),
            None if clipboard => Self::Clipboard,
            None => Self::Stdout,
        }
    }

    /// Writes `text`, trimmed, to the target.
    ///
    /// A missing clipboard tool is logged but not treated as an error.
    ///
    /// # Errors
    /// - If the output file cannot be written
    pub fn deliver(&self, text: &str) -> anyhow::Result<()> {
        let text = text.trim();
        match self {
            Self::File(path) => {
                std::fs::write(path, text).map_err(|e| {
                    anyhow::anyhow!("Failed to write to file '{}': {e}", path.display())
                })?;
                tracing::debug!("Transcribed text written to file: {}", path.display());
            }
            Self::Clipboard => copy_to_clipboard(text),
            Self::Stdout => {
                println!("{text}");
                tracing::debug!("Transcribed text printed to stdout");
            }
        }
        Ok(())
    }
}

/// Copies text to the system clipboard with the first tool that accepts it.
fn copy_to_clipboard(text: &str) {
    for (tool, args) in CLIPBOARD_TOOLS {
        let mut child = match Command::new(tool).args(*args).stdin(Stdio::piped()).spawn() {
            Ok(child) => child,
            Err(_) => {
                tracing::debug!("{tool} not found or not executable");
                continue;
            }
        };
        let Some(mut stdin) = child.stdin.take() else {
            continue;
        };
        match write!(stdin, "{text}") {
            Ok(()) => {
                drop(stdin);
                // give the tool a moment to take ownership of the selection
                thread::sleep(Duration::from_millis(100));
                tracing::debug!("Transcribed text copied to clipboard via {tool}");
                return;
            }
            Err(e) => tracing::warn!("Failed to write to {tool} stdin: {e}"),
        }
    }

    let names: Vec<&str> = CLIPBOARD_TOOLS.iter().map(|(name, _)| *name).collect();
    tracing::warn!("No clipboard tool available ({} not found)", names.join(" or "));
}
