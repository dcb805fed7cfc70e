// SPDX-License-Identifier: GPL-3.0-only

//! CPU rasterization of the viewfinder overlay
//!
//! [`PixelCanvas`] paints overlay primitives into an RGBA image using
//! source-over blending with straight alpha. The terminal host draws the
//! scaled preview frame first and the overlay on top.

use crate::app::viewfinder::{Canvas, Color, Rect};
use crate::backends::types::CameraFrame;
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

/// Canvas backed by an [`RgbaImage`]
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    /// Opaque black surface of `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    /// Surface showing `frame` stretched to `width` x `height`
    pub fn from_frame(frame: &CameraFrame, width: u32, height: u32) -> Self {
        Self {
            image: scale_frame(frame, width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend `color` over the pixel at (x, y), ignoring points off the surface
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() || color.a == 0 {
            return;
        }
        self.image
            .get_pixel_mut(x as u32, y as u32)
            .blend(&Rgba([color.r, color.g, color.b, color.a]));
    }

    fn clipped(&self, rect: Rect) -> Rect {
        rect.clamp_to(self.width(), self.height())
    }
}

/// Source-over blend of straight-alpha `src` onto `dst`
pub fn blend(mut dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    dst.blend(&Rgba([src.r, src.g, src.b, src.a]));
    dst
}

/// Nearest-neighbour stretch of a frame to the given size
pub fn scale_frame(frame: &CameraFrame, width: u32, height: u32) -> RgbaImage {
    if frame.width == 0 || frame.height == 0 || width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(&frame.to_rgba_image(), width, height, FilterType::Nearest)
}

impl Canvas for PixelCanvas {
    fn width(&self) -> i32 {
        self.image.width() as i32
    }

    fn height(&self) -> i32 {
        self.image.height() as i32
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.clipped(rect);
        if rect.is_empty() {
            return;
        }
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke_width: f32) {
        let half = ((stroke_width / 2.0).round() as i32).max(1);
        let outer = rect.outset(half);
        let inner = rect.outset(-half);

        // Top and bottom bands span the full outer width, sides fill between
        self.fill_rect(Rect::new(outer.left, outer.top, outer.right, inner.top), color);
        self.fill_rect(
            Rect::new(outer.left, inner.bottom, outer.right, outer.bottom),
            color,
        );
        self.fill_rect(Rect::new(outer.left, inner.top, inner.left, inner.bottom), color);
        self.fill_rect(
            Rect::new(inner.right, inner.top, outer.right, inner.bottom),
            color,
        );
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let left = (cx - radius).floor() as i32;
        let right = (cx + radius).ceil() as i32;
        let top = (cy - radius).floor() as i32;
        let bottom = (cy + radius).ceil() as i32;

        for y in top..=bottom {
            for x in left..=right {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        if dst.is_empty() || image.width() == 0 || image.height() == 0 || alpha == 0 {
            return;
        }
        let mut scaled = imageops::resize(
            image,
            dst.width() as u32,
            dst.height() as u32,
            FilterType::Nearest,
        );
        if alpha < 255 {
            for px in scaled.pixels_mut() {
                px[3] = (px[3] as u16 * alpha as u16 / 255) as u8;
            }
        }
        // overlay clips to the surface and accepts negative offsets
        imageops::overlay(&mut self.image, &scaled, dst.left as i64, dst.top as i64);
    }
}
