// SPDX-License-Identifier: GPL-3.0-only

//! Image files as a camera
//!
//! Streams still images as preview frames, holding each one for a while
//! before moving on and looping at the end. This stands in for a live
//! camera so the scan screen can run anywhere.

use super::frame_loop::{LoopAction, LoopController};
use super::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::{file_formats, frame_source};
use futures::channel::mpsc;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(file_formats::is_image_extension)
        .unwrap_or(false)
}

/// Expand files and directories into a sorted list of image files
pub fn collect_image_paths(inputs: &[PathBuf]) -> BackendResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut skipped = None;

    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input).map_err(|e| {
                BackendError::NoInput(format!("{}: {}", input.display(), e))
            })?;
            let mut found: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_image_extension(path))
                .collect();
            found.sort();
            debug!(dir = %input.display(), count = found.len(), "Collected images");
            paths.extend(found);
        } else if has_image_extension(input) {
            paths.push(input.clone());
        } else {
            warn!(path = %input.display(), "Skipping unsupported file");
            skipped = Some(input.display().to_string());
        }
    }

    if paths.is_empty() {
        return Err(match skipped {
            Some(path) => BackendError::Unsupported(path),
            None => BackendError::NoInput("no supported image files found".to_string()),
        });
    }
    Ok(paths)
}

/// Decode an image file into an RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let img = image::open(path).map_err(|e| {
        BackendError::Decode(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    info!(path = %path.display(), width, height, "Image loaded");

    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw()))
}

/// Decode every path, skipping files that fail
///
/// Fails when none of the images could be loaded, so a bad selection is
/// reported before the source starts.
pub fn load_frames(paths: &[PathBuf]) -> BackendResult<Vec<CameraFrame>> {
    let mut last_error = None;
    let frames: Vec<CameraFrame> = paths
        .iter()
        .filter_map(|path| match load_image_as_frame(path) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(error = %e, "Skipping image");
                last_error = Some(e);
                None
            }
        })
        .collect();

    match (frames.is_empty(), last_error) {
        (true, Some(e)) => Err(e),
        (true, None) => Err(BackendError::NoInput("no images to load".to_string())),
        (false, _) => Ok(frames),
    }
}

struct StreamState {
    frames: Vec<CameraFrame>,
    index: usize,
    shown_since: Instant,
}

/// Background loop sending frames from a list of images
pub struct FileSource {
    controller: LoopController,
}

impl FileSource {
    /// Start streaming `frames`, holding each image for `hold`
    ///
    /// Frames are dropped when the receiver is behind. The loop ends when
    /// the receiver is gone or [`FileSource::stop`] is called.
    pub fn start(
        frames: Vec<CameraFrame>,
        hold: Duration,
        mut sender: mpsc::Sender<CameraFrame>,
    ) -> Self {
        let init = move || {
            if frames.is_empty() {
                return Err("no frames to stream".to_string());
            }
            Ok(StreamState {
                frames,
                index: 0,
                shown_since: Instant::now(),
            })
        };

        let controller = LoopController::start_with_init("image-source", init, move |state| {
            if state.frames.len() > 1 && state.shown_since.elapsed() >= hold {
                state.index = (state.index + 1) % state.frames.len();
                state.shown_since = Instant::now();
                debug!(index = state.index, "Advancing to next image");
            }

            let mut frame = state.frames[state.index].clone();
            frame.captured_at = Instant::now();

            if let Err(e) = sender.try_send(frame) {
                if e.is_disconnected() {
                    debug!("Frame receiver closed");
                    return LoopAction::Stop;
                }
            }

            std::thread::sleep(frame_source::IMAGE_STREAM_FRAME_DURATION);
            LoopAction::Continue
        });

        Self { controller }
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }
}
