// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qrscanner")]
#[command(about = "Scan and generate QR codes in the terminal")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan image files for QR codes (default: the last scanned source)
    Scan {
        /// Image files or directories to stream as the preview
        paths: Vec<PathBuf>,

        /// How long each image is shown, in milliseconds
        #[arg(long)]
        hold_ms: Option<u64>,
    },

    /// Generate a QR code for some text
    Encode {
        /// Text to encode
        text: String,

        /// Write the PNG here instead of showing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image placed in the center of the code
        #[arg(short, long)]
        watermark: Option<PathBuf>,

        /// Don't show the title and text under the code
        #[arg(long)]
        hide_contents: bool,
    },

    /// Read a line from stdin and show it as a QR code
    Share,

    /// Show or reset the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration
    Show,
    /// Restore the defaults
    Reset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=qrscanner=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan { paths, hold_ms }) => cli::scan_images(paths, hold_ms),
        Some(Commands::Encode {
            text,
            output,
            watermark,
            hide_contents,
        }) => cli::encode_text(text, output, watermark, hide_contents),
        Some(Commands::Share) => cli::share_stdin(),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => cli::show_config(),
            ConfigAction::Reset => cli::reset_config(),
        },
        None => cli::scan_images(Vec::new(), None),
    }
}
