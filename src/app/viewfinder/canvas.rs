// SPDX-License-Identifier: GPL-3.0-only

//! Drawing surface abstraction for the viewfinder overlay
//!
//! The overlay only needs a handful of primitives. [`crate::media::raster::PixelCanvas`]
//! rasterizes them into an RGBA image for the terminal host, and
//! [`RecordingCanvas`] keeps a display list so draws can be inspected.

use super::geometry::Rect;
use image::RgbaImage;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xAARRGGBB` value
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Surface the overlay paints on
///
/// Coordinates are surface pixels. Rectangles use exclusive right/bottom
/// edges and may extend past the surface; implementations clip.
pub trait Canvas {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline `rect` with a border of `stroke_width` centered on its edges
    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);

    /// Draw `image` scaled into `dst`, multiplying its alpha by `alpha / 255`
    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8);
}

/// A single recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        stroke_width: f32,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
    DrawImage {
        width: u32,
        height: u32,
        dst: Rect,
        alpha: u8,
    },
}

/// Canvas that records every call instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: i32,
    height: i32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Recorded circles as `(cx, cy, radius, color)`
    pub fn circles(&self) -> Vec<(f32, f32, f32, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                DrawOp::FillCircle {
                    cx,
                    cy,
                    radius,
                    color,
                } => Some((cx, cy, radius, color)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            stroke_width,
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        self.ops.push(DrawOp::DrawImage {
            width: image.width(),
            height: image.height(),
            dst,
            alpha,
        });
    }
}
