// SPDX-License-Identifier: GPL-3.0-only

//! Pixel-level image work
//!
//! - [`raster`]: overlay rasterization and frame scaling for the terminal host

pub mod raster;

pub use raster::{PixelCanvas, scale_frame};
