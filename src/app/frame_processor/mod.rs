// SPDX-License-Identifier: GPL-3.0-only

//! Frame analysis off the UI thread
//!
//! Preview frames are cropped to the framing rect and searched for QR
//! codes. Points found along the way are reported to the overlay while
//! the search runs; decoded codes come back as [`QrDetection`]s.

pub mod tasks;
pub mod types;

pub use tasks::qr_detector::{DetectionOutcome, QrDetector};
pub use types::{FrameRegion, ParsedResult, QrDetection};
