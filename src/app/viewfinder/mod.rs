// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder overlay
//!
//! Painted on top of the camera preview. Outside the framing rect the
//! preview is dimmed. Inside it a scan line sweeps up and down, and the
//! points the decoder reports leave a short fading trail. Once a code is
//! decoded, the frozen result image replaces the live animation until
//! [`ViewfinderView::reset`] is called.
//!
//! # Threading
//!
//! The view itself lives on the UI thread. The decoder reports points
//! through the shared [`PossibleResultPoints`] returned by
//! [`ViewfinderView::point_callback`], and the scan line animator marks
//! regions dirty through [`RedrawRequest`]. The host drains that with
//! [`ViewfinderView::take_redraw`] to decide when to repaint.

pub mod animation;
pub mod canvas;
pub mod framing;
pub mod geometry;
pub mod points;

pub use animation::{SliderAnimation, SliderAnimator};
pub use canvas::{Canvas, Color, DrawOp, RecordingCanvas};
pub use framing::{FramingLimits, FramingManager, FramingSource};
pub use geometry::{Rect, ResultPoint, Size};
pub use points::{PossibleResultPoints, ResultPointCallback, RotatedPoints};

use crate::config::ViewfinderStyle;
use crate::constants::viewfinder::*;
use image::{Rgba, RgbaImage};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Area of the view that needs repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Full,
    Region(Rect),
}

impl Redraw {
    fn merge(self, other: Redraw) -> Redraw {
        match (self, other) {
            (Redraw::Region(a), Redraw::Region(b)) => Redraw::Region(a.union(&b)),
            _ => Redraw::Full,
        }
    }
}

/// Pending repaint, written from any thread and drained by the host
#[derive(Debug, Default)]
pub struct RedrawRequest {
    pending: Mutex<Option<Redraw>>,
}

impl RedrawRequest {
    fn request(&self, redraw: Redraw) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending = Some(match pending.take() {
            Some(existing) => existing.merge(redraw),
            None => redraw,
        });
    }

    pub fn invalidate(&self) {
        self.request(Redraw::Full);
    }

    pub fn invalidate_region(&self, rect: Rect) {
        self.request(Redraw::Region(rect));
    }

    pub fn take(&self) -> Option<Redraw> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

/// What the overlay shows inside the frame
#[derive(Debug, Clone)]
pub enum OverlayState {
    /// Live scanning: scan line and possible result points
    Scanning,
    /// A decoded snapshot frozen in the frame
    ShowingResult(Arc<RgbaImage>),
}

/// Map a preview-space point into display space
///
/// X and Y scale independently by frame size over preview frame size; the
/// scaled offset is truncated before adding the frame origin.
pub fn map_point(frame: Rect, preview: Rect, point: ResultPoint) -> (i32, i32) {
    let scale_x = frame.width() as f32 / preview.width() as f32;
    let scale_y = frame.height() as f32 / preview.height() as f32;
    (
        frame.left + (point.x * scale_x) as i32,
        frame.top + (point.y * scale_y) as i32,
    )
}

/// Overlay drawn on top of the camera preview
pub struct ViewfinderView {
    framing: Option<Arc<dyn FramingSource>>,
    state: OverlayState,
    points: Arc<PossibleResultPoints>,
    style: ViewfinderStyle,
    slider_bitmap: Option<RgbaImage>,
    slider_top: Arc<AtomicI32>,
    /// Running animation and the frame it sweeps
    slider: Option<(Rect, SliderAnimator)>,
    redraw: Arc<RedrawRequest>,
}

impl Default for ViewfinderView {
    fn default() -> Self {
        Self::new(ViewfinderStyle::default())
    }
}

impl ViewfinderView {
    pub fn new(style: ViewfinderStyle) -> Self {
        Self {
            framing: None,
            state: OverlayState::Scanning,
            points: Arc::new(PossibleResultPoints::new()),
            style,
            slider_bitmap: None,
            slider_top: Arc::new(AtomicI32::new(0)),
            slider: None,
            redraw: Arc::new(RedrawRequest::default()),
        }
    }

    /// Attach the provider of the framing rect
    pub fn set_framing_source(&mut self, source: Arc<dyn FramingSource>) {
        self.framing = Some(source);
    }

    /// Record a point the decoder found; callable from any thread via
    /// [`ViewfinderView::point_callback`]
    pub fn add_possible_result_point(&self, point: ResultPoint) {
        self.points.add(point);
    }

    /// Shared handle for the decoder to report points through
    pub fn point_callback(&self) -> Arc<PossibleResultPoints> {
        Arc::clone(&self.points)
    }

    /// Freeze `bitmap` in the frame instead of the live scan display
    pub fn show_result(&mut self, bitmap: Arc<RgbaImage>) {
        if let OverlayState::ShowingResult(previous) =
            std::mem::replace(&mut self.state, OverlayState::ShowingResult(bitmap))
        {
            trace!(
                width = previous.width(),
                height = previous.height(),
                "Releasing previous result bitmap"
            );
        }
        self.redraw.invalidate();
    }

    /// Drop the result bitmap and go back to scanning
    pub fn reset(&mut self) {
        if let OverlayState::ShowingResult(bitmap) =
            std::mem::replace(&mut self.state, OverlayState::Scanning)
        {
            trace!(
                width = bitmap.width(),
                height = bitmap.height(),
                "Releasing result bitmap"
            );
        }
        self.redraw.invalidate();
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_showing_result(&self) -> bool {
        matches!(self.state, OverlayState::ShowingResult(_))
    }

    pub fn possible_result_points(&self) -> &PossibleResultPoints {
        &self.points
    }

    /// Pending repaint, if any
    pub fn take_redraw(&self) -> Option<Redraw> {
        self.redraw.take()
    }

    pub fn is_animating(&self) -> bool {
        self.slider
            .as_ref()
            .map(|(_, animator)| animator.is_running())
            .unwrap_or(false)
    }

    pub fn on_detach(&mut self) {
        self.cancel_animator();
    }

    pub fn destroy(&mut self) {
        self.cancel_animator();
    }

    fn cancel_animator(&mut self) {
        if let Some((_, mut animator)) = self.slider.take() {
            animator.cancel();
        }
    }

    /// Paint the overlay
    ///
    /// Does nothing until a framing source is attached and has a frame.
    pub fn draw<C: Canvas>(&mut self, canvas: &mut C) {
        let Some(framing) = self.framing.clone() else {
            return;
        };
        let Some(frame) = framing.framing_rect() else {
            return;
        };

        self.draw_mask(canvas, frame);

        if let OverlayState::ShowingResult(bitmap) = &self.state {
            canvas.draw_image(bitmap, frame, CURRENT_POINT_OPACITY);
            return;
        }

        self.draw_middle_frame(canvas, frame);
        self.draw_scanner_line(canvas, frame);
        self.draw_possible_points(canvas, frame, framing.as_ref());
    }

    fn draw_mask<C: Canvas>(&self, canvas: &mut C, frame: Rect) {
        let width = canvas.width();
        let height = canvas.height();
        let color = Color::from_argb(match self.state {
            OverlayState::ShowingResult(_) => self.style.result_color,
            OverlayState::Scanning => self.style.mask_color,
        });

        canvas.fill_rect(Rect::new(0, 0, width, frame.top), color);
        canvas.fill_rect(
            Rect::new(0, frame.top, frame.left, frame.bottom + 1),
            color,
        );
        canvas.fill_rect(
            Rect::new(frame.right + 1, frame.top, width, frame.bottom + 1),
            color,
        );
        canvas.fill_rect(Rect::new(0, frame.bottom + 1, width, height), color);
    }

    fn draw_middle_frame<C: Canvas>(&self, canvas: &mut C, frame: Rect) {
        canvas.stroke_rect(
            frame,
            Color::from_argb(self.style.frame_color),
            FRAME_STROKE_WIDTH,
        );
    }

    fn draw_scanner_line<C: Canvas>(&mut self, canvas: &mut C, frame: Rect) {
        let line_height = self.style.slider_height.max(1) as i32;

        let animating_this_frame = matches!(&self.slider, Some((rect, _)) if *rect == frame);
        if !animating_this_frame {
            self.cancel_animator();
            self.start_animator(frame, line_height);
        }

        let slider_top = self.slider_top.load(Ordering::Relaxed);
        let line = Rect::new(
            frame.left + SLIDER_PADDING,
            slider_top,
            frame.right - SLIDER_PADDING,
            slider_top + line_height,
        );

        let laser = Color::from_argb(self.style.laser_color);
        let bitmap = self
            .slider_bitmap
            .get_or_insert_with(|| slider_line_image(laser, line_height as u32));
        canvas.draw_image(bitmap, line, u8::MAX);
    }

    fn start_animator(&mut self, frame: Rect, line_height: i32) {
        debug!(?frame, "Scan line animation bound to frame");
        self.slider_top.store(frame.top, Ordering::Relaxed);

        let animation = SliderAnimation::new(
            frame.top,
            frame.bottom - line_height,
            SLIDER_ANIM_DURATION,
        );
        let slider_top = Arc::clone(&self.slider_top);
        let redraw = Arc::clone(&self.redraw);
        let dirty = frame.outset(POINT_SIZE);

        let animator = SliderAnimator::start(animation, SLIDER_TICK_INTERVAL, move |top| {
            slider_top.store(top, Ordering::Relaxed);
            redraw.invalidate_region(dirty);
        });
        self.slider = Some((frame, animator));
    }

    fn draw_possible_points<C: Canvas>(
        &self,
        canvas: &mut C,
        frame: Rect,
        framing: &dyn FramingSource,
    ) {
        let Some(preview) = framing.preview_framing_rect() else {
            return;
        };
        if preview.width() <= 0 || preview.height() <= 0 {
            return;
        }

        let RotatedPoints { current, last } = self.points.rotate();
        let color = Color::from_argb(self.style.possible_result_points_color);

        let current_color = color.with_alpha(CURRENT_POINT_OPACITY);
        for point in &current {
            let (x, y) = map_point(frame, preview, *point);
            canvas.fill_circle(x as f32, y as f32, POINT_SIZE as f32, current_color);
        }

        let last_color = color.with_alpha(CURRENT_POINT_OPACITY / 2);
        let radius = POINT_SIZE as f32 / 2.0;
        for point in &last {
            let (x, y) = map_point(frame, preview, *point);
            canvas.fill_circle(x as f32, y as f32, radius, last_color);
        }
    }
}

/// Horizontal laser line fading out toward both ends
fn slider_line_image(color: Color, height: u32) -> RgbaImage {
    let width = SLIDER_IMAGE_WIDTH;
    RgbaImage::from_fn(width, height.max(1), |x, _| {
        let t = (2.0 * x as f32 / (width - 1) as f32) - 1.0;
        let falloff = (1.0 - t * t).max(0.0);
        Rgba([color.r, color.g, color.b, (color.a as f32 * falloff) as u8])
    })
}
