//! Display recent log entries from the application.

use crate::logging::{get_log_dir, LOG_FILE_PREFIX};
use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const DEFAULT_LINES: usize = 50;

/// Prints the last lines of the most recent log file.
///
/// # Errors
/// - If the log directory cannot be determined
/// - If log files cannot be read
pub fn handle_logs() -> Result<(), anyhow::Error> {
    let log_dir = get_log_dir()?;

    if !log_dir.exists() {
        println!("Log directory does not exist yet: {}", log_dir.display());
        println!("Logs will be created when the application runs.");
        return Ok(());
    }

    let Some(log_file) = find_latest_log(&log_dir)? else {
        println!("No log files found in: {}", log_dir.display());
        println!("Run 'tscribe' or other commands to generate logs.");
        return Ok(());
    };

    let content =
        fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;

    if content.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    let lines = tail(&content, DEFAULT_LINES);
    let total = content.lines().count();

    if lines.len() < total {
        println!("Showing last {} of {} lines:", lines.len(), total);
    } else {
        println!("Showing all {total} lines:");
    }
    println!("Full log file at: {}", log_file.display());
    println!();

    for line in lines {
        println!("{line}");
    }

    Ok(())
}

fn tail(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

/// Finds the most recently modified log file in the directory.
fn find_latest_log(log_dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    let entries =
        fs::read_dir(log_dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let mut latest: Option<(PathBuf, SystemTime)> = None;

    for entry in entries {
        let path = entry
            .map_err(|e| anyhow!("Failed to read directory entry: {e}"))?
            .path();

        if !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
        {
            continue;
        }

        let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
            continue;
        };
        if latest.as_ref().is_none_or(|(_, newest)| modified > *newest) {
            latest = Some((path, modified));
        }
    }

    Ok(latest.map(|(path, _)| path))
}
