// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! Converts the framing-rect crop of a preview frame to grayscale, looks
//! for QR grids with rqrr and decodes them. Grid corners are reported as
//! possible result points as soon as a grid is located, before decoding.

use crate::app::frame_processor::types::{FrameRegion, QrDetection};
use crate::app::viewfinder::{Rect, ResultPoint, ResultPointCallback};
use crate::backends::types::CameraFrame;
use crate::config::ScanConfig;
use crate::constants::detection::MAX_DETECTION_DIMENSION;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Result of one detection pass
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    pub detections: Vec<QrDetection>,
    /// The analysed crop, present when something was decoded
    pub snapshot: Option<Arc<RgbaImage>>,
}

/// QR code detector
#[derive(Debug, Clone)]
pub struct QrDetector {
    /// Crops are downscaled so neither side exceeds this
    max_dimension: u32,
    /// Invert luminance before detection
    invert: bool,
    /// QR decoding switched on in the config
    enabled: bool,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    pub fn new() -> Self {
        Self {
            max_dimension: MAX_DETECTION_DIMENSION,
            invert: false,
            enabled: true,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        let formats = &config.decode_formats;
        let unsupported = formats.unsupported_enabled();
        if !unsupported.is_empty() {
            warn!(formats = ?unsupported, "Only QR codes can be decoded, ignoring other formats");
        }
        if !formats.qr {
            warn!("QR decoding is disabled in the config, nothing will be decoded");
        }
        Self {
            invert: config.invert_scan,
            enabled: formats.qr,
            ..Self::new()
        }
    }

    /// Detect QR codes inside `crop` (preview pixels) of `frame`
    ///
    /// Runs on the blocking pool; `callback` receives grid corners in crop
    /// coordinates while the search runs.
    pub async fn detect(
        &self,
        frame: Arc<CameraFrame>,
        crop: Option<Rect>,
        callback: Option<Arc<dyn ResultPointCallback>>,
    ) -> DetectionOutcome {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || {
            detector.detect_blocking(&frame, crop, callback.as_deref())
        })
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "QR detection task panicked");
            DetectionOutcome::default()
        })
    }

    /// Synchronous detection, for callers already off the UI thread
    pub fn detect_blocking(
        &self,
        frame: &CameraFrame,
        crop: Option<Rect>,
        callback: Option<&dyn ResultPointCallback>,
    ) -> DetectionOutcome {
        if !self.enabled {
            return DetectionOutcome::default();
        }

        let start = std::time::Instant::now();
        let region = crop_region(frame, crop);
        if region.is_empty() {
            return DetectionOutcome::default();
        }

        let crop_width = region.width() as u32;
        let crop_height = region.height() as u32;
        let scale = (crop_width as f32 / self.max_dimension as f32)
            .max(crop_height as f32 / self.max_dimension as f32)
            .max(1.0);
        let proc_width = ((crop_width as f32 / scale) as usize).max(1);
        let proc_height = ((crop_height as f32 / scale) as usize).max(1);

        let luma = sample_luma(frame, region, proc_width, proc_height, scale, self.invert);
        trace!(proc_width, proc_height, scale, "Prepared grayscale crop");

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(proc_width, proc_height, |x, y| {
                luma[y * proc_width + x]
            });
        let grids = prepared.detect_grids();
        trace!(count = grids.len(), "Located QR grids");

        let mut detections = Vec::with_capacity(grids.len());
        for grid in grids {
            let corners: Vec<ResultPoint> = grid
                .bounds
                .iter()
                .map(|p| ResultPoint::new(p.x as f32 * scale, p.y as f32 * scale))
                .collect();

            if let Some(callback) = callback {
                for corner in &corners {
                    callback.found_possible_result_point(*corner);
                }
            }

            let content = match grid.decode() {
                Ok((_meta, content)) => content,
                Err(e) => {
                    debug!(error = %e, "Failed to decode QR grid");
                    continue;
                }
            };

            let bounds = corner_bounds(&corners, crop_width, crop_height);
            debug!(
                content = %content,
                x = bounds.x,
                y = bounds.y,
                width = bounds.width,
                height = bounds.height,
                "Decoded QR code"
            );
            detections.push(QrDetection::new(bounds, content));
        }

        let snapshot = (!detections.is_empty()).then(|| Arc::new(crop_image(frame, region)));
        if !detections.is_empty() {
            debug!(
                count = detections.len(),
                total_ms = start.elapsed().as_millis(),
                "QR detection found codes"
            );
        }

        DetectionOutcome {
            detections,
            snapshot,
        }
    }
}

/// Crop rect clipped to the frame; the whole frame when none is given
fn crop_region(frame: &CameraFrame, crop: Option<Rect>) -> Rect {
    let full = Rect::new(0, 0, frame.width as i32, frame.height as i32);
    match crop {
        Some(rect) => rect.clamp_to(full.right, full.bottom),
        None => full,
    }
}

/// Nearest-neighbour grayscale sample of `region`, downscaled by `scale`
fn sample_luma(
    frame: &CameraFrame,
    region: Rect,
    width: usize,
    height: usize,
    scale: f32,
    invert: bool,
) -> Vec<u8> {
    let mut luma = Vec::with_capacity(width * height);
    for y in 0..height {
        let src_y = region.top as u32 + (y as f32 * scale) as u32;
        for x in 0..width {
            let src_x = region.left as u32 + (x as f32 * scale) as u32;
            let value = frame.luma(src_x, src_y);
            luma.push(if invert { 255 - value } else { value });
        }
    }
    luma
}

fn corner_bounds(corners: &[ResultPoint], width: u32, height: u32) -> FrameRegion {
    let min_x = corners.iter().map(|p| p.x).fold(f32::MAX, f32::min).max(0.0);
    let min_y = corners.iter().map(|p| p.y).fold(f32::MAX, f32::min).max(0.0);
    let max_x = corners.iter().map(|p| p.x).fold(0.0, f32::max).min(width as f32);
    let max_y = corners.iter().map(|p| p.y).fold(0.0, f32::max).min(height as f32);

    FrameRegion::from_pixels(
        min_x as u32,
        min_y as u32,
        (max_x - min_x).max(0.0) as u32,
        (max_y - min_y).max(0.0) as u32,
        width,
        height,
    )
}

fn crop_image(frame: &CameraFrame, region: Rect) -> RgbaImage {
    RgbaImage::from_fn(region.width() as u32, region.height() as u32, |x, y| {
        image::Rgba(frame.pixel(region.left as u32 + x, region.top as u32 + y))
    })
}
