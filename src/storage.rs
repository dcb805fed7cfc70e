// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for generated barcodes

use crate::constants::barcode::{BARCODES_DIR, MAX_BARCODE_FILENAME_LENGTH, SCANNER_DIR};
use crate::errors::ShareError;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory generated barcodes are written to
///
/// `<pictures>/BarcodeScanner/Barcodes`, falling back to the home
/// directory when there is no pictures directory.
pub fn barcode_directory() -> Option<PathBuf> {
    let base = dirs::picture_dir().or_else(dirs::home_dir)?;
    Some(base.join(SCANNER_DIR).join(BARCODES_DIR))
}

/// File name stem for a barcode of `contents`
///
/// Anything outside `[A-Za-z0-9]` becomes `_`, capped at 24 characters.
pub fn make_barcode_file_name(contents: &str) -> String {
    contents
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_BARCODE_FILENAME_LENGTH)
        .collect()
}

/// Write `image` as a PNG named after `contents` into `dir`
///
/// The directory is created when missing and an older file with the same
/// name is replaced.
pub fn save_barcode(image: &RgbaImage, dir: &Path, contents: &str) -> Result<PathBuf, ShareError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        warn!(dir = %dir.display(), error = %e, "Couldn't make dir");
        ShareError::StorageUnavailable(format!("{}: {}", dir.display(), e))
    })?;

    let path = dir.join(format!("{}.png", make_barcode_file_name(contents)));
    if path.exists() {
        if let Err(e) = std::fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to delete old barcode");
        } else {
            debug!(path = %path.display(), "Removed old barcode");
        }
    }

    image
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| ShareError::Write(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "Barcode saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_sanitized_and_truncated() {
        assert_eq!(make_barcode_file_name("hello world!"), "hello_world_");
        assert_eq!(
            make_barcode_file_name("https://example.com/a/very/long/path"),
            "https___example_com_a_ve"
        );
        assert_eq!(make_barcode_file_name("héllo"), "h_llo");
        assert_eq!(make_barcode_file_name(""), "");
    }

    #[test]
    fn test_barcode_directory_layout() {
        if let Some(dir) = barcode_directory() {
            assert!(dir.ends_with("BarcodeScanner/Barcodes"));
        }
    }

    #[test]
    fn test_save_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let white = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        let black = RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 255]));

        let first = save_barcode(&white, &target, "same").unwrap();
        let second = save_barcode(&black, &target, "same").unwrap();
        assert_eq!(first, second);

        let reloaded = image::open(&second).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (3, 3));
    }
}
