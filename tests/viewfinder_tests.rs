// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the viewfinder overlay driven by the framing manager

use qrscanner::app::viewfinder::{
    Canvas, FramingLimits, FramingManager, FramingSource, RecordingCanvas, Rect, ResultPoint,
    ResultPointCallback, Size, ViewfinderView,
};
use qrscanner::backends::CameraFrame;
use qrscanner::config::ViewfinderStyle;
use qrscanner::media::PixelCanvas;
use std::sync::Arc;

/// 160x80 canvas over a 640x480 preview
fn terminal_framing() -> Arc<FramingManager> {
    let framing = Arc::new(FramingManager::new(FramingLimits::terminal()));
    framing.set_screen_resolution(Size::new(160, 80));
    framing.set_preview_resolution(Size::new(640, 480));
    framing
}

fn view_over(framing: &Arc<FramingManager>) -> ViewfinderView {
    let mut view = ViewfinderView::new(ViewfinderStyle::default());
    view.set_framing_source(Arc::clone(framing) as Arc<dyn FramingSource>);
    view
}

#[test]
fn test_framing_for_terminal_canvas() {
    let framing = terminal_framing();
    assert_eq!(framing.framing_rect(), Some(Rect::new(30, 15, 130, 65)));
    assert_eq!(
        framing.preview_framing_rect(),
        Some(Rect::new(120, 90, 520, 390))
    );
}

#[test]
fn test_overlay_rasterizes_over_frame() {
    let framing = terminal_framing();
    let mut view = view_over(&framing);

    let gray = vec![128u8; 640 * 480 * 4];
    let frame = CameraFrame::from_rgba(640, 480, gray);
    let mut canvas = PixelCanvas::from_frame(&frame, 160, 80);
    view.draw(&mut canvas);
    let image = canvas.image();

    // Dimmed outside the frame
    assert!(image.get_pixel(0, 0)[0] < 128);
    assert!(image.get_pixel(159, 79)[0] < 128);
    // White border on the frame edge
    assert_eq!(image.get_pixel(30, 40)[0], 255);
    // Untouched inside, left of the scan line
    assert_eq!(image.get_pixel(32, 40)[0], 128);

    view.destroy();
}

#[test]
fn test_decoder_points_appear_then_fade() {
    let framing = terminal_framing();
    let mut view = view_over(&framing);
    let callback: Arc<dyn ResultPointCallback> = view.point_callback();

    let reporter = std::thread::spawn(move || {
        callback.found_possible_result_point(ResultPoint::new(200.0, 150.0));
    });
    reporter.join().unwrap();

    let mut canvas = RecordingCanvas::new(160, 80);
    view.draw(&mut canvas);
    let circles = canvas.circles();
    assert_eq!(circles.len(), 1);
    assert_eq!((circles[0].0, circles[0].1, circles[0].2), (80.0, 40.0, 6.0));

    canvas.clear();
    view.draw(&mut canvas);
    let circles = canvas.circles();
    assert_eq!(circles.len(), 1);
    assert_eq!((circles[0].0, circles[0].1, circles[0].2), (80.0, 40.0, 3.0));
    assert!(circles[0].3.a < 0xA0);

    canvas.clear();
    view.draw(&mut canvas);
    assert!(canvas.circles().is_empty());

    view.destroy();
}

#[test]
fn test_result_image_fills_frame() {
    let framing = terminal_framing();
    let mut view = view_over(&framing);
    let bitmap = Arc::new(image::RgbaImage::from_pixel(
        4,
        4,
        image::Rgba([255, 0, 0, 255]),
    ));
    view.show_result(Arc::clone(&bitmap));

    let mut canvas = PixelCanvas::new(160, 80);
    assert_eq!(canvas.width(), 160);
    view.draw(&mut canvas);
    assert!(!view.is_animating());

    let center = canvas.image().get_pixel(80, 40);
    assert!(center[0] > 0x80 && center[1] == 0);

    view.reset();
    assert_eq!(Arc::strong_count(&bitmap), 1);
    view.destroy();
}

#[test]
fn test_no_preview_means_no_drawing() {
    let framing = Arc::new(FramingManager::new(FramingLimits::terminal()));
    framing.set_screen_resolution(Size::new(160, 80));
    let mut view = view_over(&framing);

    let mut canvas = RecordingCanvas::new(160, 80);
    view.draw(&mut canvas);
    assert!(canvas.ops.is_empty());
    assert!(!view.is_animating());
}
