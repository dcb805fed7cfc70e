// SPDX-License-Identifier: GPL-3.0-only

//! QR Scanner - scan and generate QR codes from the terminal
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Viewfinder overlay, QR detection and screen requests
//! - [`backends`]: Frame sources feeding the scan screen
//! - [`media`]: Rasterizing the overlay onto preview frames
//! - [`pipelines`]: Barcode rendering and sharing
//! - [`config`]: User configuration handling
//! - [`storage`]: Where generated barcodes are written
//! - [`terminal`]: Scan and encode screens rendered with ratatui

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::frame_processor::{ParsedResult, QrDetection, QrDetector};
pub use app::viewfinder::ViewfinderView;
pub use config::Config;
pub use errors::{AppError, AppResult};
