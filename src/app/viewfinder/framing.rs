// SPDX-License-Identifier: GPL-3.0-only

//! Framing rectangle geometry
//!
//! The framing rect is the area of the display where the user should hold
//! the code. The same area in camera preview pixels is what the decoder
//! looks at.

use super::geometry::{Rect, Size};
use crate::constants::framing::*;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Supplies the current framing rect to the overlay
///
/// Either rect may be unavailable while the preview is starting up or
/// being torn down; callers treat that as "nothing to draw yet".
pub trait FramingSource: Send + Sync {
    /// Framing rect in display coordinates
    fn framing_rect(&self) -> Option<Rect>;

    /// Framing rect in camera preview pixel coordinates
    fn preview_framing_rect(&self) -> Option<Rect>;
}

/// Clamp range for the framing rect size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingLimits {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for FramingLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_FRAME_WIDTH,
            min_height: MIN_FRAME_HEIGHT,
            max_width: MAX_FRAME_WIDTH,
            max_height: MAX_FRAME_HEIGHT,
        }
    }
}

impl FramingLimits {
    /// Limits sized for a half-block terminal canvas
    pub fn terminal() -> Self {
        Self {
            min_width: TERMINAL_MIN_FRAME,
            min_height: TERMINAL_MIN_FRAME,
            max_width: TERMINAL_MAX_FRAME_WIDTH,
            max_height: TERMINAL_MAX_FRAME_HEIGHT,
        }
    }
}

/// Five eighths of the resolution, clamped, never larger than the resolution
fn dimension_in_range(resolution: i32, hard_min: i32, hard_max: i32) -> i32 {
    let dim = 5 * resolution / 8;
    dim.clamp(hard_min, hard_max.max(hard_min)).min(resolution)
}

#[derive(Debug, Default)]
struct FramingState {
    screen: Option<Size>,
    preview: Option<Size>,
    framing: Option<Rect>,
    preview_framing: Option<Rect>,
}

/// Computes framing rects from the display and preview resolutions
#[derive(Debug, Default)]
pub struct FramingManager {
    limits: FramingLimits,
    state: RwLock<FramingState>,
}

impl FramingManager {
    pub fn new(limits: FramingLimits) -> Self {
        Self {
            limits,
            state: RwLock::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FramingState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FramingState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Update the display resolution; cached rects are recomputed lazily
    pub fn set_screen_resolution(&self, size: Size) {
        let mut state = self.write();
        if state.screen != Some(size) {
            debug!(width = size.width, height = size.height, "Screen resolution changed");
            state.screen = Some(size);
            state.framing = None;
            state.preview_framing = None;
        }
    }

    /// Update the camera preview resolution
    pub fn set_preview_resolution(&self, size: Size) {
        let mut state = self.write();
        if state.preview != Some(size) {
            debug!(width = size.width, height = size.height, "Preview resolution changed");
            state.preview = Some(size);
            state.preview_framing = None;
        }
    }

    /// Forget the preview, e.g. when the source is closed
    pub fn clear_preview(&self) {
        let mut state = self.write();
        state.preview = None;
        state.framing = None;
        state.preview_framing = None;
    }

    pub fn screen_resolution(&self) -> Option<Size> {
        self.read().screen
    }

    fn compute_framing(&self, screen: Size) -> Rect {
        let limits = &self.limits;
        let width = dimension_in_range(screen.width, limits.min_width, limits.max_width);
        let height = dimension_in_range(screen.height, limits.min_height, limits.max_height);
        let left = (screen.width - width) / 2;
        let top = (screen.height - height) / 2;
        Rect::new(left, top, left + width, top + height)
    }
}

impl FramingSource for FramingManager {
    fn framing_rect(&self) -> Option<Rect> {
        if let Some(rect) = self.read().framing {
            return Some(rect);
        }

        let mut state = self.write();
        // No frame can be computed before the preview exists
        state.preview?;
        let screen = state.screen?;
        let rect = self.compute_framing(screen);
        debug!(?rect, "Calculated framing rect");
        state.framing = Some(rect);
        Some(rect)
    }

    fn preview_framing_rect(&self) -> Option<Rect> {
        if let Some(rect) = self.read().preview_framing {
            return Some(rect);
        }

        let frame = self.framing_rect()?;
        let mut state = self.write();
        let screen = state.screen?;
        let preview = state.preview?;
        if screen.width <= 0 || screen.height <= 0 {
            return None;
        }

        let rect = Rect::new(
            frame.left * preview.width / screen.width,
            frame.top * preview.height / screen.height,
            frame.right * preview.width / screen.width,
            frame.bottom * preview.height / screen.height,
        );
        state.preview_framing = Some(rect);
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frame_without_preview() {
        let manager = FramingManager::new(FramingLimits::default());
        manager.set_screen_resolution(Size::new(1080, 1920));
        assert_eq!(manager.framing_rect(), None);
        assert_eq!(manager.preview_framing_rect(), None);
    }

    #[test]
    fn test_frame_is_centered_and_clamped() {
        let manager = FramingManager::new(FramingLimits::default());
        manager.set_screen_resolution(Size::new(1920, 1080));
        manager.set_preview_resolution(Size::new(1920, 1080));

        let frame = manager.framing_rect().unwrap();
        // 5/8 of 1920 = 1200 (at max), 5/8 of 1080 = 675 (at max)
        assert_eq!(frame.width(), 1200);
        assert_eq!(frame.height(), 675);
        assert_eq!(frame.left, 360);
        assert_eq!(frame.top, 202);
    }

    #[test]
    fn test_minimum_never_exceeds_resolution() {
        let manager = FramingManager::new(FramingLimits::default());
        manager.set_screen_resolution(Size::new(200, 100));
        manager.set_preview_resolution(Size::new(200, 100));

        let frame = manager.framing_rect().unwrap();
        assert_eq!(frame, Rect::new(0, 0, 200, 100));
    }

    #[test]
    fn test_preview_rect_scales_with_preview() {
        let manager = FramingManager::new(FramingLimits::terminal());
        manager.set_screen_resolution(Size::new(160, 80));
        manager.set_preview_resolution(Size::new(640, 480));

        let frame = manager.framing_rect().unwrap();
        assert_eq!(frame, Rect::new(30, 15, 130, 65));

        let preview = manager.preview_framing_rect().unwrap();
        assert_eq!(preview, Rect::new(120, 90, 520, 390));
    }

    #[test]
    fn test_resolution_change_invalidates_cache() {
        let manager = FramingManager::new(FramingLimits::terminal());
        manager.set_screen_resolution(Size::new(160, 80));
        manager.set_preview_resolution(Size::new(640, 480));
        let before = manager.framing_rect().unwrap();

        manager.set_screen_resolution(Size::new(80, 40));
        let after = manager.framing_rect().unwrap();
        assert_ne!(before, after);

        manager.clear_preview();
        assert_eq!(manager.framing_rect(), None);
        assert_eq!(manager.preview_framing_rect(), None);
    }
}
