//! Configuration file editor command.

use crate::config::{get_config_path, TscribeConfig};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Editors tried, in order, when neither $VISUAL nor $EDITOR is set.
const FALLBACK_EDITORS: &[&str] = &["nano", "vi"];

/// An editor program and the arguments placed before the file path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Splits a value like `code --wait` into program and arguments.
    fn parse(value: &str) -> Option<Self> {
        let mut words = value.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Picks the editor from `visual`, then `editor`, then the first fallback found on `path`.
    fn resolve(visual: Option<&str>, editor: Option<&str>, path: Option<&OsStr>) -> Option<Self> {
        visual
            .and_then(Self::parse)
            .or_else(|| editor.and_then(Self::parse))
            .or_else(|| {
                let path = path?;
                FALLBACK_EDITORS
                    .iter()
                    .find(|name| find_on_path(name, path).is_some())
                    .and_then(|name| Self::parse(name))
            })
    }

    fn command(&self, file: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(file);
        command
    }
}

/// Opens the tscribe configuration file in the user's preferred editor.
///
/// The file is created with defaults first if it does not exist. After the
/// editor exits the file is validated again so mistakes show up immediately.
///
/// # Errors
/// - If no editor can be found or executed
/// - If the edited file no longer parses
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        TscribeConfig::default().save_to(&config_path)?;
        tracing::info!("Created default config at {}", config_path.display());
    }

    let visual = std::env::var("VISUAL").ok();
    let editor = std::env::var("EDITOR").ok();
    let search_path = std::env::var_os("PATH");
    let editor = EditorCommand::resolve(
        visual.as_deref(),
        editor.as_deref(),
        search_path.as_deref(),
    )
    .ok_or_else(|| anyhow::anyhow!("No editor found. Set $VISUAL or $EDITOR, or install nano."))?;

    tracing::info!("Editing {} with {:?}", config_path.display(), editor);

    let status = editor.command(&config_path).status().map_err(|e| {
        anyhow::anyhow!("Failed to start editor '{}': {e}", editor.program)
    })?;
    if !status.success() {
        anyhow::bail!(
            "Editor '{}' exited with {}",
            editor.program,
            status
                .code()
                .map_or_else(|| "a signal".to_string(), |code| format!("code {code}"))
        );
    }

    TscribeConfig::load_from(&config_path).map_err(|e| {
        anyhow::anyhow!(
            "{} is invalid, run 'tscribe config' again to fix it: {e:#}",
            config_path.display()
        )
    })?;

    tracing::info!("Config file edited successfully");
    Ok(())
}

/// Finds an executable file called `name` in one of the `path` directories.
fn find_on_path(name: &str, path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
