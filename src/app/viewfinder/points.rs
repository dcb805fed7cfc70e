// SPDX-License-Identifier: GPL-3.0-only

//! Possible result point trail
//!
//! The decoder reports interesting points while it works on a frame; the
//! overlay draws them as a fading trail. Appends come from the decoder
//! thread and rotation from the draw thread, both under one mutex.

use super::geometry::ResultPoint;
use crate::constants::viewfinder::MAX_RESULT_POINTS;
use std::sync::{Mutex, MutexGuard};

/// Receives points of interest from the decoder during a scan attempt
pub trait ResultPointCallback: Send + Sync {
    fn found_possible_result_point(&self, point: ResultPoint);
}

#[derive(Debug, Default)]
struct PointSets {
    current: Vec<ResultPoint>,
    last: Option<Vec<ResultPoint>>,
}

/// Points handed to one draw pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotatedPoints {
    /// Points gathered since the previous pass, drawn at full opacity
    pub current: Vec<ResultPoint>,
    /// Points drawn as `current` on the previous pass, drawn faint
    pub last: Vec<ResultPoint>,
}

/// Bounded, lock-guarded current/last point sets
#[derive(Debug, Default)]
pub struct PossibleResultPoints {
    sets: Mutex<PointSets>,
}

impl PossibleResultPoints {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PointSets> {
        // A panic while holding the lock leaves the vectors intact
        self.sets.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a point, trimming to half capacity once the cap is exceeded
    pub fn add(&self, point: ResultPoint) {
        let mut sets = self.lock();
        sets.current.push(point);
        let size = sets.current.len();
        if size > MAX_RESULT_POINTS {
            sets.current.drain(..size - MAX_RESULT_POINTS / 2);
        }
    }

    /// Hand out the sets for drawing and start a fresh current set
    ///
    /// When nothing new arrived the faint trail is dropped as well, so a
    /// stale trail disappears after one empty pass.
    pub fn rotate(&self) -> RotatedPoints {
        let mut sets = self.lock();
        let last = sets.last.take().unwrap_or_default();
        if sets.current.is_empty() {
            return RotatedPoints {
                current: Vec::new(),
                last,
            };
        }

        let current = std::mem::take(&mut sets.current);
        sets.last = Some(current.clone());
        RotatedPoints { current, last }
    }

    /// Copy of the accumulating set
    pub fn current(&self) -> Vec<ResultPoint> {
        self.lock().current.clone()
    }

    /// Copy of the set that will be drawn faint next
    pub fn last(&self) -> Option<Vec<ResultPoint>> {
        self.lock().last.clone()
    }

    pub fn clear(&self) {
        let mut sets = self.lock();
        sets.current.clear();
        sets.last = None;
    }
}

impl ResultPointCallback for PossibleResultPoints {
    fn found_possible_result_point(&self, point: ResultPoint) {
        self.add(point);
    }
}
