// SPDX-License-Identifier: GPL-3.0-only

//! QR code rendering
//!
//! The symbol is encoded with `qrcode` and rendered to pixels here: dark
//! modules black on white, a quiet zone around the symbol, and an optional
//! watermark centered on top.

use crate::app::density::DensityUtils;
use crate::app::intents::EncodeRequest;
use crate::constants::barcode::{MIN_BARCODE_DIP, QUIET_ZONE_MODULES, WATERMARK_FRACTION};
use crate::errors::EncodeError;
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use qrcode::QrCode;
use std::path::Path;
use tracing::{debug, info};

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Side length for a barcode shown on `display`
///
/// Uses 7/8 of the shorter display edge, but never less than
/// [`MIN_BARCODE_DIP`] on low density displays.
pub fn barcode_dimension(display: &DensityUtils) -> u32 {
    let fitted = display.screen_width().min(display.screen_height()) * 7 / 8;
    let floor = display.dip_to_px(MIN_BARCODE_DIP).max(0) as u32;
    fitted.max(floor)
}

/// A rendered QR code for one encode request
#[derive(Debug, Clone)]
pub struct QrCodeEncoder {
    request: EncodeRequest,
    image: RgbaImage,
    modules: usize,
}

impl QrCodeEncoder {
    /// Encode `request` into an image at least `dimension` pixels wide
    pub fn new(request: EncodeRequest, dimension: u32) -> Result<Self, EncodeError> {
        if request.data.is_empty() {
            return Err(EncodeError::EmptyContents);
        }

        let code = QrCode::new(request.data.as_bytes())?;
        let modules = code.width();
        let image = render(&code, dimension);
        debug!(
            modules,
            size = image.width(),
            format = %request.format,
            "Encoded barcode"
        );

        Ok(Self {
            request,
            image,
            modules,
        })
    }

    /// Overlay `watermark` at the center, scaled to a fifth of the barcode width
    pub fn with_watermark(mut self, watermark: &DynamicImage) -> Self {
        let target_width = (self.image.width() / WATERMARK_FRACTION).max(1);
        let (w, h) = (watermark.width().max(1), watermark.height().max(1));
        let target_height = ((h as u64 * target_width as u64) / w as u64).max(1) as u32;

        let scaled = imageops::resize(
            &watermark.to_rgba8(),
            target_width,
            target_height,
            imageops::FilterType::Triangle,
        );
        let x = (self.image.width() as i64 - target_width as i64) / 2;
        let y = (self.image.height() as i64 - target_height as i64) / 2;
        imageops::overlay(&mut self.image, &scaled, x, y);

        debug!(width = target_width, height = target_height, "Applied watermark");
        self
    }

    /// Load a watermark from disk and apply it
    pub fn with_watermark_file(self, path: &Path) -> Result<Self, EncodeError> {
        let watermark =
            image::open(path).map_err(|e| EncodeError::Watermark(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded watermark");
        Ok(self.with_watermark(&watermark))
    }

    pub fn request(&self) -> &EncodeRequest {
        &self.request
    }

    pub fn contents(&self) -> &str {
        &self.request.data
    }

    /// Title above the barcode, empty when contents are hidden
    pub fn title(&self) -> &'static str {
        if self.request.show_contents {
            self.request.contents_type.title()
        } else {
            ""
        }
    }

    /// Text shown under the barcode, empty when contents are hidden
    pub fn display_contents(&self) -> &str {
        if self.request.show_contents {
            &self.request.data
        } else {
            ""
        }
    }

    /// Symbol width in modules, without the quiet zone
    pub fn modules(&self) -> usize {
        self.modules
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Render `code` with a quiet zone, scaled to at least `dimension` pixels
fn render(code: &QrCode, dimension: u32) -> RgbaImage {
    let modules = code.width();
    let total = modules + 2 * QUIET_ZONE_MODULES;
    let scale = (dimension as usize).div_ceil(total).max(1);
    let size = (total * scale) as u32;

    let colors = code.to_colors();
    let mut image = RgbaImage::from_pixel(size, size, LIGHT);

    for (y, row) in colors.chunks(modules).enumerate() {
        for (x, color) in row.iter().enumerate() {
            if *color != qrcode::Color::Dark {
                continue;
            }
            let left = ((x + QUIET_ZONE_MODULES) * scale) as u32;
            let top = ((y + QUIET_ZONE_MODULES) * scale) as u32;
            for dy in 0..scale as u32 {
                for dx in 0..scale as u32 {
                    image.put_pixel(left + dx, top + dy, DARK);
                }
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayMetrics;

    fn request(text: &str) -> EncodeRequest {
        EncodeRequest::text(text).unwrap()
    }

    fn display(width_px: u32, height_px: u32, density_dpi: f32) -> DensityUtils {
        DensityUtils::new(DisplayMetrics {
            width_px,
            height_px,
            density_dpi,
        })
    }

    #[test]
    fn test_dimension_uses_shorter_edge() {
        assert_eq!(barcode_dimension(&display(1080, 1920, 480.0)), 945);
    }

    #[test]
    fn test_dimension_has_density_floor() {
        // 7/8 of 200 is 175, below 120 dip at 320 dpi
        assert_eq!(barcode_dimension(&display(200, 400, 320.0)), 240);
    }

    #[test]
    fn test_render_size_and_quiet_zone() {
        let encoder = QrCodeEncoder::new(request("hello"), 100).unwrap();
        let image = encoder.image();
        assert!(image.width() >= 100);
        assert_eq!(image.width(), image.height());
        // Quiet zone is white, the finder pattern corner is dark
        assert_eq!(image.get_pixel(0, 0), &LIGHT);
        let scale = image.width() as usize / (encoder.modules() + 2 * QUIET_ZONE_MODULES);
        let corner = (QUIET_ZONE_MODULES * scale) as u32;
        assert_eq!(image.get_pixel(corner, corner), &DARK);
    }

    #[test]
    fn test_title_and_hidden_contents() {
        let shown = QrCodeEncoder::new(request("abc"), 50).unwrap();
        assert_eq!(shown.title(), "Text");
        assert_eq!(shown.display_contents(), "abc");

        let hidden =
            QrCodeEncoder::new(request("abc").with_show_contents(false), 50).unwrap();
        assert_eq!(hidden.title(), "");
        assert_eq!(hidden.display_contents(), "");
        assert_eq!(hidden.contents(), "abc");
    }

    #[test]
    fn test_empty_contents_rejected() {
        let mut empty = request("x");
        empty.data.clear();
        assert!(matches!(
            QrCodeEncoder::new(empty, 50),
            Err(EncodeError::EmptyContents)
        ));
    }

    #[test]
    fn test_watermark_is_centered() {
        let encoder = QrCodeEncoder::new(request("watermark"), 200).unwrap();
        let size = encoder.image().width();
        let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let marked = encoder.with_watermark(&red);

        let center = size / 2;
        assert_eq!(marked.image().get_pixel(center, center), &Rgba([255, 0, 0, 255]));
        assert_eq!(marked.image().get_pixel(0, 0), &LIGHT);
    }
}
