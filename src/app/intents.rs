// SPDX-License-Identifier: GPL-3.0-only

//! Requests passed between screens
//!
//! The scan screen can hand a decoded text to the encode screen, and the
//! share command starts the encode screen directly. Screens are started
//! through a [`ScreenLauncher`] so the request building can be tested
//! without a terminal.

use crate::errors::AppResult;
use std::path::PathBuf;
use tracing::debug;

/// Kind of data carried by an encode request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentsType {
    #[default]
    Text,
}

impl ContentsType {
    /// Title shown above the barcode
    pub fn title(&self) -> &'static str {
        match self {
            ContentsType::Text => "Text",
        }
    }
}

/// Barcode symbology to encode with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarcodeFormat {
    #[default]
    QrCode,
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarcodeFormat::QrCode => write!(f, "QR_CODE"),
        }
    }
}

/// Request to show a generated barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub contents_type: ContentsType,
    pub data: String,
    pub format: BarcodeFormat,
    /// Show the title and text under the barcode
    pub show_contents: bool,
}

impl EncodeRequest {
    /// QR code request for `text`, `None` when the text is empty
    pub fn text(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            contents_type: ContentsType::Text,
            data: text.to_string(),
            format: BarcodeFormat::QrCode,
            show_contents: true,
        })
    }

    pub fn with_show_contents(mut self, show_contents: bool) -> Self {
        self.show_contents = show_contents;
        self
    }
}

/// Request to run the scan screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Image files or directories streamed as the preview
    pub sources: Vec<PathBuf>,
}

/// Text decoded by a finished scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub text: String,
}

/// Something that can bring up another screen
pub trait ScreenLauncher {
    fn launch_encode(&mut self, request: EncodeRequest) -> AppResult<()>;
}

/// Open the encode screen for `text`; empty text does nothing
pub fn launch_create_qrcode<L: ScreenLauncher + ?Sized>(
    text: &str,
    launcher: &mut L,
) -> AppResult<()> {
    match EncodeRequest::text(text) {
        Some(request) => launcher.launch_encode(request),
        None => {
            debug!("Ignoring encode request for empty text");
            Ok(())
        }
    }
}
