// SPDX-License-Identifier: GPL-3.0-only

//! Encode screen
//!
//! Shows a generated QR code with its title and contents. `s` saves the
//! PNG and opens a mail draft with the text.

use super::{HalfBlockImage, StatusBar, Tui, split_status, terminal_error};
use crate::constants::terminal::INPUT_POLL;
use crate::errors::{AppResult, ShareError};
use crate::pipelines::barcode::{QrCodeEncoder, prepare_share, send};
use crate::storage;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use tracing::{error, info};

/// Actions bound to keys on the encode screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeCommand {
    Share,
    Quit,
}

impl EncodeCommand {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }
        match key.code {
            KeyCode::Char('s') => Some(Self::Share),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

const STATUS_MESSAGE: &str = "'s' save & share | 'q' back";

/// Save the barcode and open the mail client, returning a status line
fn share_barcode(encoder: &QrCodeEncoder) -> String {
    let dir = storage::barcode_directory();
    match prepare_share(Some(encoder), dir.as_deref()) {
        Ok(Some(request)) => match send(&request) {
            Ok(()) => format!("Saved {}, attach it to the draft", request.attachment.display()),
            Err(e) => {
                error!(error = %e, "Failed to open mail client");
                format!("Saved {} ({})", request.attachment.display(), e)
            }
        },
        Ok(None) => ShareError::NoBarcode.to_string(),
        Err(e) => {
            error!(error = %e, "Failed to save barcode");
            format!("Error: {}", e)
        }
    }
}

/// Split the area above the status bar into title, barcode and contents rows
fn layout(body: Rect, has_title: bool, has_contents: bool) -> (Rect, Rect, Rect) {
    let title_height = u16::from(has_title).min(body.height);
    let contents_height = u16::from(has_contents).min(body.height - title_height);
    let title = Rect {
        height: title_height,
        ..body
    };
    let barcode = Rect {
        y: body.y + title_height,
        height: body.height - title_height - contents_height,
        ..body
    };
    let contents = Rect {
        y: barcode.y + barcode.height,
        height: contents_height,
        ..body
    };
    (title, barcode, contents)
}

/// Show `encoder` until the user leaves the screen
pub fn run(terminal: &mut Tui, encoder: &QrCodeEncoder) -> AppResult<()> {
    info!(title = encoder.title(), "Showing barcode");
    let mut status_message = STATUS_MESSAGE.to_string();

    loop {
        terminal
            .draw(|f| {
                let (body, status_area) = split_status(f.area());
                let title = encoder.title();
                let contents = encoder.display_contents();
                let (title_area, barcode_area, contents_area) =
                    layout(body, !title.is_empty(), !contents.is_empty());

                if !title.is_empty() {
                    f.render_widget(
                        Paragraph::new(title)
                            .alignment(Alignment::Center)
                            .style(Style::default().add_modifier(Modifier::BOLD)),
                        title_area,
                    );
                }
                f.render_widget(HalfBlockImage::new(encoder.image()), barcode_area);
                if !contents.is_empty() {
                    f.render_widget(
                        Paragraph::new(contents).alignment(Alignment::Center),
                        contents_area,
                    );
                }
                f.render_widget(
                    StatusBar {
                        message: &status_message,
                    },
                    status_area,
                );
            })
            .map_err(terminal_error)?;

        if event::poll(INPUT_POLL).map_err(terminal_error)?
            && let Event::Key(key) = event::read().map_err(terminal_error)?
            && key.kind == KeyEventKind::Press
        {
            match EncodeCommand::from_key(&key) {
                Some(EncodeCommand::Quit) => break,
                Some(EncodeCommand::Share) => status_message = share_barcode(encoder),
                None => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        let share = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(EncodeCommand::from_key(&share), Some(EncodeCommand::Share));
        assert_eq!(EncodeCommand::from_key(&quit), Some(EncodeCommand::Quit));
        assert_eq!(EncodeCommand::from_key(&ctrl_c), Some(EncodeCommand::Quit));
    }

    #[test]
    fn test_layout_reserves_text_rows() {
        let body = Rect::new(0, 0, 30, 20);
        let (title, barcode, contents) = layout(body, true, true);
        assert_eq!(title, Rect::new(0, 0, 30, 1));
        assert_eq!(barcode, Rect::new(0, 1, 30, 18));
        assert_eq!(contents, Rect::new(0, 19, 30, 1));

        let (title, barcode, contents) = layout(body, false, false);
        assert_eq!(title.height, 0);
        assert_eq!(barcode, body);
        assert_eq!(contents.height, 0);
    }
}
