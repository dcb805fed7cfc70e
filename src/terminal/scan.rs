// SPDX-License-Identifier: GPL-3.0-only

//! Scan screen
//!
//! Streams image files as a preview, paints the viewfinder overlay on top
//! and runs QR detection on the framing rect whenever the detector is idle.

use super::{HalfBlockImage, StatusBar, TerminalLauncher, Tui, canvas_size, split_status, terminal_error};
use crate::app::density::DensityUtils;
use crate::app::frame_processor::{DetectionOutcome, QrDetection, QrDetector};
use crate::app::intents::{ScanRequest, ScanResult, launch_create_qrcode};
use crate::app::viewfinder::{FramingLimits, FramingManager, FramingSource, Size, ViewfinderView};
use crate::backends::{CameraFrame, FileSource, collect_image_paths, load_frames};
use crate::config::Config;
use crate::constants::{frame_source, terminal::INPUT_POLL};
use crate::errors::{AppResult, ScanError};
use crate::media::PixelCanvas;
use crate::pipelines::barcode::barcode_dimension;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::channel::mpsc;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Actions bound to keys on the scan screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanCommand {
    Reset,
    Open,
    Encode,
    ToggleHelp,
    Quit,
}

impl ScanCommand {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }
        match key.code {
            KeyCode::Char('r') => Some(Self::Reset),
            KeyCode::Char('o') => Some(Self::Open),
            KeyCode::Char('e') => Some(Self::Encode),
            KeyCode::Char('h') => Some(Self::ToggleHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

fn build_status_message() -> String {
    "Place a QR code inside the frame | 'h' help | 'q' quit".to_string()
}

fn build_help_message() -> String {
    "r: Rescan | o: Open | e: Encode | h: Toggle help | q/Ctrl+C: Quit".to_string()
}

fn build_result_message(detection: &QrDetection) -> String {
    let mut msg = format!("{}: {}", detection.parsed.display_name(), detection.content);
    if detection.parsed.open_target().is_some() {
        msg.push_str(" | 'o' open");
    }
    msg.push_str(" | 'e' encode | 'r' rescan");
    msg
}

/// Detection result tagged with the scan it belongs to
struct TaggedOutcome {
    epoch: u64,
    frame: Arc<CameraFrame>,
    outcome: DetectionOutcome,
}

/// Run the scan screen until the user quits
///
/// Returns the last decoded text, if any.
pub fn run(
    terminal: &mut Tui,
    config: &Config,
    request: ScanRequest,
    hold: Duration,
) -> AppResult<Option<ScanResult>> {
    let paths = collect_image_paths(&request.sources)?;
    let frames = load_frames(&paths)?;
    info!(count = frames.len(), "Starting scan screen");

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        ScanError::DecoderUnavailable(format!("failed to start runtime: {}", e))
    })?;

    let (frame_tx, mut frame_rx) = mpsc::channel(frame_source::CHANNEL_CAPACITY);
    let mut source = FileSource::start(frames, hold, frame_tx);
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded::<TaggedOutcome>();

    let framing = Arc::new(FramingManager::new(FramingLimits::terminal()));
    let mut view = ViewfinderView::new(config.viewfinder);
    view.set_framing_source(Arc::clone(&framing) as Arc<dyn FramingSource>);
    let detector = QrDetector::from_config(&config.scan);

    let mut latest: Option<Arc<CameraFrame>> = None;
    let mut frame_generation: u64 = 0;
    let mut submitted_generation: u64 = 0;
    let mut detecting = false;
    let mut epoch: u64 = 0;
    let mut result: Option<QrDetection> = None;
    let mut show_help = false;
    let mut status_message = build_status_message();
    let mut needs_draw = true;

    let last = loop {
        // Drain all available frames to get the latest
        while let Ok(frame) = frame_rx.try_recv() {
            framing.set_preview_resolution(Size::new(frame.width as i32, frame.height as i32));
            latest = Some(Arc::new(frame));
            frame_generation += 1;
            needs_draw = true;
        }

        if let Err(e) = check_source(latest.is_some(), source.is_running()) {
            error!(error = %e, "Frame source stopped before the first frame");
            break Err(e);
        }

        while let Ok(tagged) = outcome_rx.try_recv() {
            detecting = false;
            if tagged.epoch != epoch || view.is_showing_result() {
                debug!("Dropping stale detection result");
                continue;
            }
            let Some(detection) = tagged.outcome.detections.into_iter().next() else {
                continue;
            };

            let bitmap = tagged
                .outcome
                .snapshot
                .unwrap_or_else(|| Arc::new(tagged.frame.to_rgba_image()));
            view.show_result(bitmap);
            if config.scan.play_beep {
                ring_bell(terminal);
            }
            info!(kind = detection.parsed.display_name(), "Scan succeeded");
            show_help = false;
            status_message = build_result_message(&detection);
            result = Some(detection);
            needs_draw = true;
        }

        if !detecting
            && !view.is_showing_result()
            && frame_generation > submitted_generation
            && let Some(frame) = latest.clone()
            && let Some(crop) = framing.preview_framing_rect()
        {
            submitted_generation = frame_generation;
            detecting = true;
            let detector = detector.clone();
            let callback = view.point_callback();
            let tx = outcome_tx.clone();
            let scan_epoch = epoch;
            runtime.spawn(async move {
                let outcome = detector
                    .detect(Arc::clone(&frame), Some(crop), Some(callback))
                    .await;
                let _ = tx.unbounded_send(TaggedOutcome {
                    epoch: scan_epoch,
                    frame,
                    outcome,
                });
            });
        }

        if view.take_redraw().is_some() {
            needs_draw = true;
        }

        if needs_draw {
            needs_draw = false;
            terminal
                .draw(|f| {
                    let (body, status_area) = split_status(f.area());
                    let (width, height) = canvas_size(f.area().width, f.area().height);
                    framing.set_screen_resolution(Size::new(width as i32, height as i32));

                    let mut canvas = match &latest {
                        Some(frame) => PixelCanvas::from_frame(frame, width, height),
                        None => PixelCanvas::new(width, height),
                    };
                    view.draw(&mut canvas);
                    let image = canvas.into_image();
                    f.render_widget(HalfBlockImage::new(&image), body);

                    let message = if latest.is_none() {
                        "Waiting for frames..."
                    } else {
                        status_message.as_str()
                    };
                    f.render_widget(StatusBar { message }, status_area);
                })
                .map_err(terminal_error)?;
        }

        if event::poll(INPUT_POLL).map_err(terminal_error)? {
            match event::read().map_err(terminal_error)? {
                Event::Resize(..) => needs_draw = true,
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    needs_draw = true;
                    match ScanCommand::from_key(&key) {
                        Some(ScanCommand::Quit) => break Ok(result.take()),
                        Some(ScanCommand::Reset) => {
                            epoch += 1;
                            result = None;
                            show_help = false;
                            view.reset();
                            view.possible_result_points().clear();
                            status_message = build_status_message();
                            debug!(epoch, "Scan reset");
                        }
                        Some(ScanCommand::Open) => {
                            if let Some(target) = result.as_ref().and_then(|r| r.parsed.open_target())
                            {
                                match open::that(&target) {
                                    Ok(()) => status_message = format!("Opened {}", target),
                                    Err(e) => {
                                        error!(target = %target, error = %e, "Failed to open result");
                                        status_message = format!("Error: {}", e);
                                    }
                                }
                            }
                        }
                        Some(ScanCommand::Encode) => {
                            if let Some(detection) = &result {
                                let density = DensityUtils::new(config.display);
                                let dimension = barcode_dimension(&density);
                                let mut launcher = TerminalLauncher::new(terminal, dimension);
                                if let Err(e) = launch_create_qrcode(&detection.content, &mut launcher) {
                                    error!(error = %e, "Failed to show barcode");
                                    status_message = format!("Error: {}", e);
                                }
                                terminal.clear().map_err(terminal_error)?;
                            }
                        }
                        Some(ScanCommand::ToggleHelp) => {
                            show_help = !show_help;
                            status_message = match (&result, show_help) {
                                (_, true) => build_help_message(),
                                (Some(detection), false) => build_result_message(detection),
                                (None, false) => build_status_message(),
                            };
                        }
                        None => {}
                    }
                }
                _ => {}
            }
        }
    };

    view.destroy();
    source.stop();
    runtime.shutdown_timeout(Duration::from_millis(500));
    debug!("Scan screen closed");

    Ok(last?.map(|d| ScanResult { text: d.content }))
}

/// A source that exits before producing a frame never will
fn check_source(has_frame: bool, source_running: bool) -> Result<(), ScanError> {
    if has_frame || source_running {
        Ok(())
    } else {
        Err(ScanError::ImageLoad(
            "frame source stopped without producing a frame".to_string(),
        ))
    }
}

fn ring_bell(terminal: &mut Tui) {
    let backend = terminal.backend_mut();
    if let Err(e) = backend.write_all(b"\x07").and_then(|_| backend.flush()) {
        warn!(error = %e, "Failed to ring bell");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame_processor::FrameRegion;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_key_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('r'), none)),
            Some(ScanCommand::Reset)
        );
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('o'), none)),
            Some(ScanCommand::Open)
        );
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('e'), none)),
            Some(ScanCommand::Encode)
        );
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('h'), none)),
            Some(ScanCommand::ToggleHelp)
        );
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('q'), none)),
            Some(ScanCommand::Quit)
        );
        assert_eq!(
            ScanCommand::from_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(ScanCommand::Quit)
        );
        assert_eq!(ScanCommand::from_key(&key(KeyCode::Char('c'), none)), None);
    }

    #[test]
    fn test_stopped_source_without_frames_is_an_error() {
        assert!(check_source(true, false).is_ok());
        assert!(check_source(false, true).is_ok());
        assert!(matches!(
            check_source(false, false),
            Err(ScanError::ImageLoad(_))
        ));
    }

    #[test]
    fn test_result_message() {
        let url = QrDetection::new(
            FrameRegion::from_pixels(0, 0, 1, 1, 1, 1),
            "https://example.com".to_string(),
        );
        let msg = build_result_message(&url);
        assert!(msg.starts_with("URL: https://example.com"));
        assert!(msg.contains("'o' open"));

        let text = QrDetection::new(FrameRegion::from_pixels(0, 0, 1, 1, 1, 1), "hi".to_string());
        assert!(!build_result_message(&text).contains("'o' open"));
    }
}
