// SPDX-License-Identifier: GPL-3.0-only

//! Scanner application logic
//!
//! # Architecture
//!
//! - `viewfinder`: overlay drawn over the preview (mask, frame, scan line, points)
//! - `frame_processor`: QR detection on preview frames
//! - `intents`: requests passed between screens
//! - `density`: dip/pixel conversion for display sizing

pub mod density;
pub mod frame_processor;
pub mod intents;
pub mod viewfinder;

pub use density::DensityUtils;
pub use intents::{EncodeRequest, ScanRequest, ScanResult, ScreenLauncher, launch_create_qrcode};
pub use viewfinder::{FramingManager, ViewfinderView};
