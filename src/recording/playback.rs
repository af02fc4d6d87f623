//! Plays a recorded clip through the system audio player.

use super::audio::RecordedClip;
use anyhow::anyhow;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Players tried in order on Linux and other unix systems.
#[cfg(not(target_os = "macos"))]
const PLAYERS: &[(&str, &[&str])] = &[
    ("paplay", &[]),
    ("aplay", &["-q"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpv", &["--no-video", "--really-quiet"]),
];

#[cfg(target_os = "macos")]
const PLAYERS: &[(&str, &[&str])] = &[("afplay", &[])];

/// Path of the temporary WAV file used for playback.
fn playback_path() -> PathBuf {
    std::env::temp_dir().join(format!("tscribe_{}.wav", std::process::id()))
}

/// Writes the clip to a temporary WAV file and starts playing it in the background.
///
/// The player's output is discarded so it cannot disturb the terminal UI.
///
/// # Errors
/// - If the temporary WAV file cannot be written
/// - If none of the known audio players can be started
pub fn play_clip(clip: &RecordedClip) -> anyhow::Result<Child> {
    let path = playback_path();
    clip.write_wav(&path)?;

    for (player, args) in PLAYERS {
        match Command::new(player)
            .args(*args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                tracing::info!("Playing clip with {}", player);
                return Ok(child);
            }
            Err(e) => tracing::debug!("{} unavailable: {}", player, e),
        }
    }

    let names: Vec<&str> = PLAYERS.iter().map(|(name, _)| *name).collect();
    Err(anyhow!("No audio player found. Install one of: {}", names.join(", ")))
}

/// Removes the temporary playback file, if any.
pub fn cleanup_playback_file() {
    let path = playback_path();
    if path.exists() {
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!("Failed to remove playback file: {}", e);
        }
    }
}
