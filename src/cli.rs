// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Scanning image files with the interactive scan screen
//! - Generating QR codes, shown in the terminal or written to a file
//! - Sharing text read from stdin as a QR code
//! - Inspecting and resetting the configuration

use qrscanner::app::density::DensityUtils;
use qrscanner::app::intents::{EncodeRequest, ScanRequest, ScreenLauncher, launch_create_qrcode};
use qrscanner::config::Config;
use qrscanner::constants::frame_source;
use qrscanner::errors::{EncodeError, ScanError};
use qrscanner::pipelines::barcode::{QrCodeEncoder, barcode_dimension};
use qrscanner::terminal::{self, TerminalLauncher, scan};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Scan images from `paths`, or from the last scanned source when empty
pub fn scan_images(
    paths: Vec<PathBuf>,
    hold_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load();

    let sources = if paths.is_empty() {
        let last = config
            .last_scan_source
            .clone()
            .ok_or(ScanError::NoFrameSource)?;
        info!(path = %last.display(), "Scanning last used source");
        vec![last]
    } else {
        config.last_scan_source = Some(paths[0].clone());
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to remember scan source");
        }
        paths
    };

    let hold = hold_ms
        .map(Duration::from_millis)
        .unwrap_or(frame_source::DEFAULT_HOLD);

    let result = terminal::with_terminal(|tui| {
        scan::run(tui, &config, ScanRequest { sources }, hold)
    })?;

    match result {
        Some(result) => println!("{}", result.text),
        None => println!("No QR code scanned."),
    }
    Ok(())
}

/// Generate a QR code for `text`
///
/// With `output` the PNG is written there, otherwise the encode screen is shown.
pub fn encode_text(
    text: String,
    output: Option<PathBuf>,
    watermark: Option<PathBuf>,
    hide_contents: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let dimension = barcode_dimension(&DensityUtils::new(config.display));
    let request = EncodeRequest::text(&text)
        .ok_or(EncodeError::EmptyContents)?
        .with_show_contents(!hide_contents);

    if let Some(output) = output {
        let mut encoder = QrCodeEncoder::new(request, dimension)?;
        if let Some(path) = &watermark {
            encoder = encoder.with_watermark_file(path)?;
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        encoder.image().save(&output)?;
        println!("Barcode saved: {}", output.display());
        return Ok(());
    }

    terminal::with_terminal(|tui| {
        TerminalLauncher::new(tui, dimension)
            .with_watermark(watermark)
            .launch_encode(request)
    })?;
    Ok(())
}

/// Read one line from stdin and show it as a QR code
pub fn share_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let text = line.trim();
    if text.is_empty() {
        println!("Nothing to share.");
        return Ok(());
    }

    let config = Config::load();
    let dimension = barcode_dimension(&DensityUtils::new(config.display));
    terminal::with_terminal(|tui| {
        launch_create_qrcode(text, &mut TerminalLauncher::new(tui, dimension))
    })?;
    Ok(())
}

/// Print the effective configuration
pub fn show_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    match Config::path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory)"),
    }
    let density = DensityUtils::new(config.display);
    println!(
        "{} screen {}x{} px ({}x{} dip)",
        density,
        density.screen_width(),
        density.screen_height(),
        density.px_to_dip(density.screen_width() as f32),
        density.px_to_dip(density.screen_height() as f32),
    );

    let unsupported = config.scan.decode_formats.unsupported_enabled();
    if !unsupported.is_empty() {
        println!("Not decoded (QR only): {}", unsupported.join(", "));
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Overwrite the config file with defaults
pub fn reset_config() -> Result<(), Box<dyn std::error::Error>> {
    Config::default().save()?;
    println!("Config reset to defaults.");
    Ok(())
}
