// SPDX-License-Identifier: GPL-3.0-only

//! Scan line animation
//!
//! [`SliderAnimation`] maps elapsed time to the line's vertical offset. The
//! line sweeps down and back up forever, easing in and out at both ends.
//! [`SliderAnimator`] samples it on a background tick loop.

use crate::backends::frame_loop::{LoopAction, LoopController};
use std::f64::consts::PI;
use std::time::{Duration, Instant};
use tracing::debug;

/// Endlessly repeating, auto-reversing interpolation between two offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderAnimation {
    from: i32,
    to: i32,
    duration: Duration,
}

impl SliderAnimation {
    pub fn new(from: i32, to: i32, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    /// Eased progress in `[0, 1]`; odd sweeps run backwards
    pub fn fraction_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let cycles = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let sweep = cycles.floor();
        let mut t = cycles - sweep;
        if sweep as u64 % 2 == 1 {
            t = 1.0 - t;
        }
        accelerate_decelerate(t)
    }

    /// Offset at `elapsed` since the animation started
    pub fn value_at(&self, elapsed: Duration) -> i32 {
        let fraction = self.fraction_at(elapsed);
        self.from + (fraction * f64::from(self.to - self.from)) as i32
    }
}

/// Slow start, fast middle, slow end
fn accelerate_decelerate(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Running scan line animation
///
/// Each tick passes the current offset to the callback. Cancelling stops
/// the tick thread; it is safe to cancel repeatedly or never.
pub struct SliderAnimator {
    controller: Option<LoopController>,
}

impl SliderAnimator {
    pub fn start<F>(animation: SliderAnimation, tick_interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(i32) + Send + 'static,
    {
        debug!(
            from = animation.from,
            to = animation.to,
            "Starting scan line animation"
        );
        let started = Instant::now();
        let controller = LoopController::start("viewfinder-slider", move || {
            on_tick(animation.value_at(started.elapsed()));
            std::thread::sleep(tick_interval);
            LoopAction::Continue
        });

        Self {
            controller: Some(controller),
        }
    }

    pub fn is_running(&self) -> bool {
        self.controller
            .as_ref()
            .map(LoopController::is_running)
            .unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            debug!("Cancelling scan line animation");
            controller.stop();
        }
    }
}

impl Drop for SliderAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, Ordering};

    const PERIOD: Duration = Duration::from_millis(3000);

    #[test]
    fn test_ping_pong_endpoints() {
        let animation = SliderAnimation::new(10, 110, PERIOD);
        assert_eq!(animation.value_at(Duration::ZERO), 10);
        assert_eq!(animation.value_at(PERIOD), 110);
        assert_eq!(animation.value_at(PERIOD * 2), 10);
        assert_eq!(animation.value_at(PERIOD * 3), 110);
    }

    #[test]
    fn test_midpoint_and_symmetry() {
        let animation = SliderAnimation::new(0, 100, PERIOD);
        // Truncation may land one below the exact midpoint
        assert!((49..=50).contains(&animation.value_at(PERIOD / 2)));

        // The way back mirrors the way down
        let down = animation.value_at(Duration::from_millis(750));
        let up = animation.value_at(Duration::from_millis(5250));
        assert_eq!(down, up);
    }

    #[test]
    fn test_easing_is_slow_at_edges() {
        let animation = SliderAnimation::new(0, 1000, PERIOD);
        let first_tenth = animation.value_at(PERIOD / 10);
        let middle_tenth =
            animation.value_at(PERIOD * 6 / 10) - animation.value_at(PERIOD * 5 / 10);
        assert!(first_tenth < middle_tenth);
    }

    #[test]
    fn test_values_stay_in_range() {
        let animation = SliderAnimation::new(20, 80, PERIOD);
        for ms in (0..12_000).step_by(37) {
            let value = animation.value_at(Duration::from_millis(ms));
            assert!((20..=80).contains(&value), "{value} out of range at {ms}ms");
        }
    }

    #[test]
    fn test_animator_ticks_and_cancels() {
        let latest = Arc::new(AtomicI32::new(-1));
        let latest_clone = Arc::clone(&latest);
        let mut animator = SliderAnimator::start(
            SliderAnimation::new(5, 50, PERIOD),
            Duration::from_millis(1),
            move |value| latest_clone.store(value, Ordering::SeqCst),
        );

        std::thread::sleep(Duration::from_millis(30));
        assert!(animator.is_running());
        assert!((5..=50).contains(&latest.load(Ordering::SeqCst)));

        animator.cancel();
        assert!(!animator.is_running());
        animator.cancel();
        assert!(!animator.is_running());
    }
}
