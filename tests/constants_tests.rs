// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use qrscanner::constants::{barcode, file_formats, framing, viewfinder};
use std::time::Duration;

#[test]
fn test_point_trail_limits() {
    assert_eq!(viewfinder::MAX_RESULT_POINTS, 20);
    assert_eq!(viewfinder::POINT_SIZE, 6);
    assert_eq!(viewfinder::CURRENT_POINT_OPACITY, 0xA0);
}

#[test]
fn test_slider_timing() {
    assert_eq!(viewfinder::SLIDER_ANIM_DURATION, Duration::from_millis(3000));
    assert!(viewfinder::SLIDER_TICK_INTERVAL < viewfinder::SLIDER_ANIM_DURATION);
}

#[test]
fn test_framing_limits_are_ordered() {
    assert!(framing::MIN_FRAME_WIDTH <= framing::MAX_FRAME_WIDTH);
    assert!(framing::MIN_FRAME_HEIGHT <= framing::MAX_FRAME_HEIGHT);
    assert!(framing::TERMINAL_MIN_FRAME <= framing::TERMINAL_MAX_FRAME_HEIGHT);
    assert!(framing::TERMINAL_MAX_FRAME_HEIGHT <= framing::TERMINAL_MAX_FRAME_WIDTH);
}

#[test]
fn test_image_extensions_case_insensitive() {
    for ext in file_formats::IMAGE_EXTENSIONS {
        assert!(file_formats::is_image_extension(ext));
        assert!(
            file_formats::is_image_extension(&ext.to_uppercase()),
            "Extension {} should match in upper case",
            ext
        );
    }
    assert!(!file_formats::is_image_extension("txt"));
}

#[test]
fn test_barcode_file_name_limit() {
    assert_eq!(barcode::MAX_BARCODE_FILENAME_LENGTH, 24);
    assert_eq!(barcode::SHARE_MIME_TYPE, "image/png");
}
