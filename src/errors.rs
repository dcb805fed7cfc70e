// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the scanner application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Scanning-related errors
    Scan(ScanError),
    /// Barcode generation errors
    Encode(EncodeError),
    /// Save/share errors
    Share(ShareError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Terminal setup or rendering errors
    Terminal(String),
    /// Generic error with message
    Other(String),
}

/// Scan-specific errors
#[derive(Debug, Clone)]
pub enum ScanError {
    /// No frame source was given and none is remembered
    NoFrameSource,
    /// File extension is not a supported image format
    UnsupportedFile(String),
    /// An image could not be decoded into a frame
    ImageLoad(String),
    /// Decoder runtime could not be started
    DecoderUnavailable(String),
}

/// Barcode generation errors
#[derive(Debug, Clone)]
pub enum EncodeError {
    /// Nothing to encode
    EmptyContents,
    /// The symbol encoder rejected the contents
    Encoding(String),
    /// Watermark image could not be loaded
    Watermark(String),
}

/// Save and share errors
#[derive(Debug, Clone)]
pub enum ShareError {
    /// No barcode has been generated yet
    NoBarcode,
    /// Barcode directory could not be created
    StorageUnavailable(String),
    /// Writing the barcode file failed
    Write(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scan(e) => write!(f, "Scan error: {}", e),
            AppError::Encode(e) => write!(f, "Encode error: {}", e),
            AppError::Share(e) => write!(f, "Share error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Terminal(msg) => write!(f, "Terminal error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::NoFrameSource => write!(f, "No images to scan"),
            ScanError::UnsupportedFile(path) => write!(f, "Unsupported file: {}", path),
            ScanError::ImageLoad(msg) => write!(f, "Failed to load image: {}", msg),
            ScanError::DecoderUnavailable(msg) => write!(f, "Decoder unavailable: {}", msg),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EmptyContents => write!(f, "No contents to encode"),
            EncodeError::Encoding(msg) => write!(f, "Could not encode barcode: {}", msg),
            EncodeError::Watermark(msg) => write!(f, "Could not load watermark: {}", msg),
        }
    }
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::NoBarcode => write!(f, "No existing barcode to send"),
            ShareError::StorageUnavailable(msg) => {
                write!(f, "Barcode storage unavailable: {}", msg)
            }
            ShareError::Write(msg) => write!(f, "Could not write barcode: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for ScanError {}
impl std::error::Error for EncodeError {}
impl std::error::Error for ShareError {}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        AppError::Scan(err)
    }
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::Encode(err)
    }
}

impl From<ShareError> for AppError {
    fn from(err: ShareError) -> Self {
        AppError::Share(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::ImageLoad(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<qrcode::types::QrError> for EncodeError {
    fn from(err: qrcode::types::QrError) -> Self {
        EncodeError::Encoding(err.to_string())
    }
}

impl From<qrcode::types::QrError> for AppError {
    fn from(err: qrcode::types::QrError) -> Self {
        AppError::Encode(err.into())
    }
}

impl From<std::io::Error> for ShareError {
    fn from(err: std::io::Error) -> Self {
        ShareError::Write(err.to_string())
    }
}
