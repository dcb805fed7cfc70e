// SPDX-License-Identifier: GPL-3.0-only

//! Density-independent pixel conversion

use crate::config::DisplayMetrics;
use std::fmt;

/// Dots per inch at which one dip equals one pixel
const BASELINE_DPI: f32 = 160.0;

/// Converts between density-independent pixels and display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityUtils {
    metrics: DisplayMetrics,
    scale: f32,
}

impl DensityUtils {
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            metrics,
            scale: metrics.density_dpi / BASELINE_DPI,
        }
    }

    pub fn dip_to_px(&self, dip: f32) -> i32 {
        (dip * self.scale + 0.5) as i32
    }

    pub fn px_to_dip(&self, px: f32) -> i32 {
        (px / self.scale + 0.5) as i32
    }

    pub fn screen_width(&self) -> u32 {
        self.metrics.width_px
    }

    pub fn screen_height(&self) -> u32 {
        self.metrics.height_px
    }

    pub fn density_dpi(&self) -> f32 {
        self.metrics.density_dpi
    }
}

impl fmt::Display for DensityUtils {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DensityDpi:{}", self.metrics.density_dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(dpi: f32) -> DisplayMetrics {
        DisplayMetrics {
            width_px: 720,
            height_px: 1280,
            density_dpi: dpi,
        }
    }

    #[test]
    fn test_dip_px_conversion() {
        let density = DensityUtils::new(metrics(320.0));
        assert_eq!(density.dip_to_px(10.0), 20);
        assert_eq!(density.px_to_dip(20.0), 10);
        // Rounds half up
        assert_eq!(density.px_to_dip(21.0), 11);
        assert_eq!(density.px_to_dip(20.9), 10);
    }

    #[test]
    fn test_baseline_density_is_identity() {
        let density = DensityUtils::new(metrics(160.0));
        assert_eq!(density.dip_to_px(48.0), 48);
        assert_eq!(density.px_to_dip(48.0), 48);
    }

    #[test]
    fn test_accessors_and_display() {
        let density = DensityUtils::new(metrics(480.0));
        assert_eq!(density.screen_width(), 720);
        assert_eq!(density.screen_height(), 1280);
        assert_eq!(density.density_dpi(), 480.0);
        assert_eq!(density.to_string(), "DensityDpi:480");
    }
}
