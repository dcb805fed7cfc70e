// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for barcode generation, detection and sharing

use qrscanner::QrDetector;
use qrscanner::app::intents::EncodeRequest;
use qrscanner::app::viewfinder::{PossibleResultPoints, ResultPointCallback};
use qrscanner::backends::CameraFrame;
use qrscanner::config::ScanConfig;
use qrscanner::pipelines::barcode::{QrCodeEncoder, prepare_share};
use qrscanner::storage::make_barcode_file_name;
use std::sync::Arc;

fn encode(text: &str) -> QrCodeEncoder {
    QrCodeEncoder::new(EncodeRequest::text(text).unwrap(), 200).unwrap()
}

fn frame_of(encoder: &QrCodeEncoder) -> CameraFrame {
    let image = encoder.image().clone();
    let (width, height) = image.dimensions();
    CameraFrame::from_rgba(width, height, image.into_raw())
}

#[test]
fn test_encoded_code_decodes_to_original_text() {
    let text = "https://example.com/scan?id=42";
    let frame = frame_of(&encode(text));
    let points = PossibleResultPoints::new();

    let outcome = QrDetector::new().detect_blocking(&frame, None, Some(&points));

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].content, text);
    assert!(outcome.snapshot.is_some());
    // The four grid corners were reported before decoding
    assert_eq!(points.current().len(), 4);
}

#[tokio::test]
async fn test_async_detection_reports_points() {
    let text = "WIFI:S:home;T:WPA;P:secret;;";
    let frame = Arc::new(frame_of(&encode(text)));
    let points = Arc::new(PossibleResultPoints::new());
    let callback: Arc<dyn ResultPointCallback> = points.clone();

    let outcome = QrDetector::new().detect(frame, None, Some(callback)).await;

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].parsed.display_name(), "Wi-Fi");
    assert!(!points.current().is_empty());
}

#[test]
fn test_inverted_scan_reads_light_on_dark_codes() {
    let text = "inverted";
    let mut image = encode(text).image().clone();
    for pixel in image.pixels_mut() {
        pixel[0] = 255 - pixel[0];
        pixel[1] = 255 - pixel[1];
        pixel[2] = 255 - pixel[2];
    }
    let (width, height) = image.dimensions();
    let frame = CameraFrame::from_rgba(width, height, image.into_raw());

    let config = ScanConfig {
        invert_scan: true,
        ..ScanConfig::default()
    };
    let outcome = QrDetector::from_config(&config).detect_blocking(&frame, None, None);

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].content, text);
}

#[test]
fn test_barcode_file_names() {
    assert_eq!(make_barcode_file_name("a b/c"), "a_b_c");
    assert_eq!(make_barcode_file_name(&"x".repeat(40)).len(), 24);
}

#[test]
fn test_share_writes_png_named_after_contents() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = encode("share me");

    let request = prepare_share(Some(&encoder), Some(dir.path()))
        .unwrap()
        .expect("a share request");

    assert_eq!(request.attachment, dir.path().join("share_me.png"));
    assert_eq!(request.subject, "QR Scanner - Text");
    let saved = image::open(&request.attachment).unwrap();
    assert_eq!(saved.width(), encoder.image().width());
}
