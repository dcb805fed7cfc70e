// SPDX-License-Identifier: GPL-3.0-only

//! Terminal screens
//!
//! Images are rendered with Unicode half-block characters, two pixels per
//! cell, with the last row reserved for a status bar.
//!
//! - [`scan`]: preview with the viewfinder overlay and live QR detection
//! - [`encode`]: a generated QR code with save and share

pub mod encode;
pub mod scan;

use crate::app::intents::{EncodeRequest, ScreenLauncher};
use crate::errors::{AppError, AppResult};
use crate::pipelines::barcode::QrCodeEncoder;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, Stdout, stdout};
use std::path::PathBuf;
use tracing::{info, warn};

/// Terminal used by every screen
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub(crate) fn terminal_error(err: io::Error) -> AppError {
    AppError::Terminal(err.to_string())
}

/// Run `screen` with raw mode and the alternate screen enabled
///
/// The terminal is restored before returning, also when `screen` or the
/// setup fails. An error from `screen` wins over a restore error.
pub fn with_terminal<T>(screen: impl FnOnce(&mut Tui) -> AppResult<T>) -> AppResult<T> {
    enable_raw_mode().map_err(terminal_error)?;
    let setup = execute!(stdout(), EnterAlternateScreen)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout())));
    let mut terminal = match setup {
        Ok(terminal) => terminal,
        Err(e) => {
            if let Err(restore) = restore_terminal() {
                warn!(error = %restore, "Failed to restore terminal");
            }
            return Err(terminal_error(e));
        }
    };

    let result = screen(&mut terminal);
    let restored = restore_terminal();
    result.and_then(|value| restored.map(|_| value))
}

/// Leave raw mode and the alternate screen, running every step
fn restore_terminal() -> AppResult<()> {
    first_error([
        disable_raw_mode(),
        execute!(stdout(), LeaveAlternateScreen, Show),
    ])
}

/// First failure among already executed steps
fn first_error(results: impl IntoIterator<Item = io::Result<()>>) -> AppResult<()> {
    match results.into_iter().find_map(Result::err) {
        Some(e) => Err(terminal_error(e)),
        None => Ok(()),
    }
}

/// Pixel canvas size for a terminal area: one column per pixel, two pixels
/// per row, minus the status row
pub fn canvas_size(columns: u16, rows: u16) -> (u32, u32) {
    (columns as u32, rows.saturating_sub(1) as u32 * 2)
}

/// Split an area into the image area and the status row below it
pub(crate) fn split_status(area: Rect) -> (Rect, Rect) {
    let body = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.saturating_sub(1),
    };
    let status = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: area.height.min(1),
    };
    (body, status)
}

/// Starts the encode screen inside an already prepared terminal
pub struct TerminalLauncher<'a> {
    terminal: &'a mut Tui,
    dimension: u32,
    watermark: Option<PathBuf>,
}

impl<'a> TerminalLauncher<'a> {
    pub fn new(terminal: &'a mut Tui, dimension: u32) -> Self {
        Self {
            terminal,
            dimension,
            watermark: None,
        }
    }

    pub fn with_watermark(mut self, watermark: Option<PathBuf>) -> Self {
        self.watermark = watermark;
        self
    }
}

impl ScreenLauncher for TerminalLauncher<'_> {
    fn launch_encode(&mut self, request: EncodeRequest) -> AppResult<()> {
        info!(format = %request.format, "Launching encode screen");
        let mut encoder = QrCodeEncoder::new(request, self.dimension)?;
        if let Some(path) = &self.watermark {
            encoder = encoder.with_watermark_file(path)?;
        }
        encode::run(self.terminal, &encoder)
    }
}

/// Widget that renders an RGBA image using half-block characters
///
/// The image is fitted into the area keeping its aspect ratio and centered.
pub struct HalfBlockImage<'a> {
    image: &'a RgbaImage,
}

impl<'a> HalfBlockImage<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self { image }
    }
}

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let image = self.image;
        if image.width() == 0 || image.height() == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels
        let image_aspect = image.width() as f64 / image.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height as u32 * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > image_aspect {
            let h = term_height;
            ((h * image_aspect) as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            (w as u16, (w / image_aspect / 2.0) as u16)
        };
        let display_width = display_width.clamp(1, area.width);
        let display_height = display_height.clamp(1, area.height);

        let x_offset = area.x + (area.width - display_width) / 2;
        let y_offset = area.y + (area.height - display_height) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height as u32 * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = ((tx as f64 * x_scale) as u32).min(image.width() - 1);
                let src_y_top = ((ty as f64 * 2.0 * y_scale) as u32).min(image.height() - 1);
                let src_y_bottom =
                    (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(image.height() - 1);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(to_color(image.get_pixel(src_x, src_y_top)));
                    cell.set_bg(to_color(image.get_pixel(src_x, src_y_bottom)));
                }
            }
        }
    }
}

fn to_color(pixel: &image::Rgba<u8>) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

/// Single-line status bar
pub struct StatusBar<'a> {
    pub message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}
