//! Command-line surface for `pd`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PD - check and convert saved model responses for the drawing canvas
#[derive(Parser)]
#[command(name = "pd", version, about, long_about = None)]
pub struct Cli {
    /// Service config as JSON (model, stream pacing, system prompt)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a raw model response and print the sanitized events
    Validate {
        /// Response file, or `-` for stdin
        file: PathBuf,
    },

    /// Convert a raw model response into editor changes
    Convert {
        /// Response file, or `-` for stdin
        file: PathBuf,
        /// Apply the changes to an empty in-memory canvas and print the result
        #[arg(long)]
        apply: bool,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the canvas summary the model sees for a prompt
    Describe {
        /// Prompt JSON file, or `-` for stdin
        prompt: PathBuf,
    },

    /// Print the chat messages that would be sent for a prompt
    Messages {
        /// Prompt JSON file, or `-` for stdin
        prompt: PathBuf,
    },

    /// Replay a recorded response through the service, streaming changes
    /// with the configured pacing
    Replay {
        /// Prompt JSON file
        prompt: PathBuf,
        /// Recorded response file, or `-` for stdin
        response: PathBuf,
    },
}
