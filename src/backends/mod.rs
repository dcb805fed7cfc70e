// SPDX-License-Identifier: GPL-3.0-only

//! Frame sources
//!
//! ```text
//! ┌──────────────┐   try_send   ┌────────────────┐
//! │  FileSource  │ ───────────▶ │  scan screen   │
//! │ (loop thread)│  mpsc (4)    │   (UI loop)    │
//! └──────────────┘              └────────────────┘
//! ```
//!
//! - [`frame_loop`]: background loop thread with an explicit stop signal
//! - [`file_source`]: image files streamed as preview frames
//! - [`types`]: frame type and backend errors

pub mod file_source;
pub mod frame_loop;
pub mod types;

pub use file_source::{FileSource, collect_image_paths, load_frames};
pub use frame_loop::{LoopAction, LoopController};
pub use types::{BackendError, BackendResult, CameraFrame};
