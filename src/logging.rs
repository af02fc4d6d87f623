//! Structured logging for tscribe using the tracing crate.
//!
//! Configures a rolling file logger that writes to daily-rotated log files.
//! Follows the XDG Base Directory Specification for log file placement.
//! Terminal UI commands log to file only so the screen stays clean; the
//! `serve` command also mirrors events to stderr.
//! Old log files are cleaned up automatically, keeping only the 7 most recent days.

use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// File name prefix of every log file.
pub const LOG_FILE_PREFIX: &str = "tscribe.log";

const MAX_LOG_FILES: usize = 7;

/// Global non-blocking guard holder to keep the appender alive for the program lifetime.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Where log events are written in addition to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Log file only (interactive commands)
    FileOnly,
    /// Log file plus stderr (long-running service)
    FileAndStderr,
}

/// Initializes the logging system with file-based output.
///
/// Sets up a non-blocking rolling file appender that rotates daily.
/// Log level is controlled by the RUST_LOG environment variable (defaults to "info").
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If logging was already initialized
pub fn init_logging(output: LogOutput) -> Result<(), anyhow::Error> {
    let log_dir = get_log_dir()?;
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to cleanup old logs: {e}");
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| anyhow!("Logging already initialized"))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = (output == LogOutput::FileAndStderr).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .with(stderr_layer)
        .init();

    tracing::debug!("Logging initialized. Log file: {}", log_dir.display());
    Ok(())
}

/// Determines the log directory, following XDG Base Directory Specification.
///
/// Prefers XDG_STATE_HOME if set, otherwise uses ~/.local/state/tscribe.
///
/// # Errors
/// - If home directory cannot be determined
pub fn get_log_dir() -> Result<PathBuf, anyhow::Error> {
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg_state).join("tscribe"));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local/state/tscribe"))
}

/// Returns true for rotated log files named `tscribe.log.YYYY-MM-DD`.
fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.len() == 10 && date.matches('-').count() == 2)
}

/// Removes rotated log files beyond the newest [`MAX_LOG_FILES`].
///
/// # Errors
/// - If the log directory cannot be read
fn cleanup_old_logs(log_dir: &Path) -> Result<(), anyhow::Error> {
    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_rotated_log(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, file_name, modified))
        })
        .collect();

    // Newest first; the date suffix breaks ties between equal mtimes
    log_files.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| b.1.cmp(&a.1)));

    for (path, _, _) in log_files.iter().skip(MAX_LOG_FILES) {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to delete old log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rotated_log() {
        assert!(is_rotated_log("tscribe.log.2026-10-19"));
        assert!(!is_rotated_log("tscribe.log"));
        assert!(!is_rotated_log("tscribe.log.old"));
        assert!(!is_rotated_log("other.log.2026-10-19"));
    }

    #[test]
    fn test_cleanup_keeps_newest_seven() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=10 {
            let name = format!("tscribe.log.2026-10-{day:02}");
            fs::write(dir.path().join(name), "line\n").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        cleanup_old_logs(dir.path()).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| is_rotated_log(name))
            .collect();
        remaining.sort();

        assert_eq!(remaining.len(), MAX_LOG_FILES);
        assert!(dir.path().join("notes.txt").exists());
    }
}
