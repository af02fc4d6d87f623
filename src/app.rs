//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging::{self, LogOutput};
use crate::output::OutputTarget;
use crate::ui::Page;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Record or upload audio and get it transcribed, from the terminal
#[derive(Parser)]
#[command(name = "tscribe")]
#[command(version)]
#[command(about = "Record or upload audio and get it transcribed, from the terminal")]
#[command(long_about = "Record or upload audio and get it transcribed, from the terminal.\n\nDEFAULT COMMAND:\n    If no command is specified, the terminal app opens on the record page.\n    Output options (-c, -o) apply to the app and to 'upload'.\n\nEXAMPLES:\n    # Start the stub transcription endpoint\n    $ tscribe serve\n\n    # Record, transcribe, and pipe the text on exit\n    $ tscribe | wc -w\n\n    # Open the app on the upload page\n    $ tscribe app --page upload\n\n    # Transcribe a file and copy the text to the clipboard\n    $ tscribe upload memo.m4a -c\n\n    # Use another endpoint\n    $ tscribe --endpoint http://10.0.0.5:3000/api/transcribe upload talk.mp3 -o talk.txt")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/tscribe/tscribe.toml\n    Logs:               ~/.local/state/tscribe/tscribe.log.*"
)]
struct Cli {
    /// Transcription endpoint URL, overriding client.endpoint from the config file
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Copy transcription to clipboard instead of stdout
    #[arg(short, long, global = true)]
    clipboard: bool,

    /// Write transcription to file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the terminal app (default)
    ///
    /// Switch pages with Tab or the Ctrl+B menu. The last transcription is
    /// written to the output target when the app exits.
    App {
        /// Page shown first
        #[arg(long, value_enum, default_value_t = Page::Record)]
        page: Page,
    },

    /// Open the terminal app on the record page
    ///
    /// Space starts and stops recording, Enter sends the clip, p plays it back,
    /// x discards it, q quits. SIGUSR1 stops an ongoing recording.
    #[command(visible_alias = "r")]
    Record,

    /// Transcribe an audio file without the terminal app
    ///
    /// Accepts MP3, WAV, M4A and OGG files. Prompts for the path when none is given.
    ///
    /// Examples:
    ///   tscribe upload memo.wav
    ///   tscribe upload meeting.mp3 -c
    ///   tscribe upload talk.ogg -o talk.txt
    #[command(visible_alias = "u")]
    Upload {
        /// Path to the audio file
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Run the stub transcription endpoint
    ///
    /// Serves POST /api/transcribe, which answers every upload with a mock
    /// transcription after a short delay.
    Serve {
        /// Address to listen on, overriding server.bind
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Simulated processing time, overriding server.processing_delay_ms
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   tscribe completions bash > tscribe.bash
    ///   tscribe completions zsh > _tscribe
    ///   tscribe completions fish > tscribe.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "tscribe", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            if let Err(e) = commands::handle_list_devices() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        Some(Commands::Logs) => {
            if let Err(e) = commands::handle_logs() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        _ => {}
    }

    let log_output = match cli.command {
        Some(Commands::Serve { .. }) => LogOutput::FileAndStderr,
        _ => LogOutput::FileOnly,
    };
    logging::init_logging(log_output)?;

    let output = OutputTarget::from_flags(cli.clipboard, cli.output);

    match cli.command {
        None | Some(Commands::Record) => {
            commands::handle_app(Page::Record, cli.endpoint, output).await?;
        }
        Some(Commands::App { page }) => {
            commands::handle_app(page, cli.endpoint, output).await?;
        }
        Some(Commands::Upload { file }) => {
            if let Err(e) = commands::handle_upload(file, cli.endpoint, output).await {
                // cliclack has already shown the cancellation
                if commands::upload::is_cancelled(&e) {
                    tracing::info!("Upload cancelled by user");
                    process::exit(130);
                }
                return Err(e);
            }
        }
        Some(Commands::Serve { bind, delay_ms }) => {
            commands::handle_serve(bind, delay_ms).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
