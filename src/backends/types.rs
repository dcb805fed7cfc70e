// SPDX-License-Identifier: GPL-3.0-only

//! Frame and backend error types

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Result type for frame source operations
pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Clone)]
pub enum BackendError {
    /// No usable input was found
    NoInput(String),
    /// Input has an extension no decoder handles
    Unsupported(String),
    /// Input exists but could not be decoded
    Decode(String),
    Other(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NoInput(msg) => write!(f, "No input: {}", msg),
            BackendError::Unsupported(path) => write!(f, "Unsupported file: {}", path),
            BackendError::Decode(msg) => write!(f, "Decode failed: {}", msg),
            BackendError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for crate::errors::AppError {
    fn from(err: BackendError) -> Self {
        use crate::errors::ScanError;
        match err {
            BackendError::NoInput(_) => ScanError::NoFrameSource.into(),
            BackendError::Unsupported(path) => ScanError::UnsupportedFile(path).into(),
            BackendError::Decode(msg) | BackendError::Other(msg) => {
                ScanError::ImageLoad(msg).into()
            }
        }
    }
}

/// One RGBA preview frame
///
/// Rows may carry padding; `stride` is the byte length of a row.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub stride: u32,
    /// When the frame was produced (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// RGBA of the pixel at (x, y), clamped to the frame
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0, 0xFF];
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = y * self.stride as usize + x * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0, 0, 0, 0xFF],
        }
    }

    /// BT.601 luma of the pixel at (x, y)
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        let [r, g, b, _] = self.pixel(x, y);
        ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
    }

    /// Copy the pixels into a packed image
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_respects_stride() {
        let data: Vec<u8> = vec![
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            9, 9, // padding
            0, 0, 255, 255, // blue
            255, 255, 255, 255, // white
            9, 9, // padding
        ];
        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            stride: 10,
            captured_at: Instant::now(),
        };

        assert_eq!(frame.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(frame.pixel(1, 0), [0, 255, 0, 255]);
        assert_eq!(frame.pixel(0, 1), [0, 0, 255, 255]);
        assert_eq!(frame.pixel(5, 5), [255, 255, 255, 255]);
        assert_eq!(frame.luma(1, 1), 255);
        assert_eq!(frame.luma(0, 0), 76);

        let packed = frame.to_rgba_image();
        assert_eq!(packed.as_raw().len(), 16);
    }

    #[test]
    fn test_backend_errors_map_to_scan_errors() {
        use crate::errors::{AppError, ScanError};

        let err: AppError = BackendError::NoInput("empty".into()).into();
        assert!(matches!(err, AppError::Scan(ScanError::NoFrameSource)));

        let err: AppError = BackendError::Unsupported("a.txt".into()).into();
        assert!(matches!(err, AppError::Scan(ScanError::UnsupportedFile(p)) if p == "a.txt"));

        let err: AppError = BackendError::Decode("bad".into()).into();
        assert!(matches!(err, AppError::Scan(ScanError::ImageLoad(_))));
    }
}
