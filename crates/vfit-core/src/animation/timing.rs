#![forbid(unsafe_code)]

//! Fixed-duration eased interpolation between two values.
//!
//! Used for the backdrop fade: unlike the sheet offset, backdrop opacity
//! follows a simple time curve instead of a spring.
//!
//! # Invariants
//!
//! 1. `value()` equals `from` before the first tick and `to` once complete.
//! 2. Elapsed time never exceeds the duration.
//! 3. A zero duration completes on the first tick.

use std::time::Duration;

use super::{Animation, EasingFn, ease_in_out};

/// Default duration for timed transitions (300ms).
pub const DEFAULT_TIMING_DURATION: Duration = Duration::from_millis(300);

/// Eased interpolation from `from` to `to` over `duration`.
#[derive(Debug, Clone)]
pub struct Timing {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
    started: bool,
}

impl Timing {
    /// Create a timed transition with the default ease-in-out curve.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: ease_in_out,
            started: false,
        }
    }

    /// Replace the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.started { 1.0 } else { 0.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Timing {
    fn tick(&mut self, dt: Duration) {
        self.started = true;
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.started && self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        let eased = (self.easing)(self.progress());
        self.from + (self.to - self.from) * eased
    }

    fn velocity(&self) -> f64 {
        if self.is_complete() || self.duration.is_zero() {
            return 0.0;
        }
        // Finite difference over 1ms of progress.
        let h = 0.001 / self.duration.as_secs_f64();
        let t = self.progress();
        let t2 = (t + h).min(1.0);
        if t2 <= t {
            return 0.0;
        }
        let dv = ((self.easing)(t2) - (self.easing)(t)) * (self.to - self.from);
        dv / ((t2 - t) * self.duration.as_secs_f64())
    }

    fn target(&self) -> f64 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::linear;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn starts_at_from_and_ends_at_to() {
        let mut fade = Timing::new(0.0, 0.7, DEFAULT_TIMING_DURATION);
        assert!(fade.value().abs() < f64::EPSILON);
        for _ in 0..30 {
            fade.tick(MS_16);
        }
        assert!(fade.is_complete());
        assert!((fade.value() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn linear_midpoint() {
        let mut fade = Timing::new(10.0, 20.0, Duration::from_millis(100)).easing(linear);
        fade.tick(Duration::from_millis(50));
        assert!((fade.value() - 15.0).abs() < 1e-9);
        assert!(!fade.is_complete());
    }

    #[test]
    fn elapsed_is_capped_at_duration() {
        let mut fade = Timing::new(0.0, 1.0, Duration::from_millis(100));
        fade.tick(Duration::from_secs(5));
        assert!((fade.progress() - 1.0).abs() < f64::EPSILON);
        assert!((fade.value() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut fade = Timing::new(0.7, 0.0, Duration::ZERO);
        assert!(!fade.is_complete());
        assert!((fade.value() - 0.7).abs() < f64::EPSILON);
        fade.tick(Duration::ZERO);
        assert!(fade.is_complete());
        assert!(fade.value().abs() < f64::EPSILON);
    }

    #[test]
    fn fade_out_decreases_monotonically() {
        let mut fade = Timing::new(0.7, 0.0, DEFAULT_TIMING_DURATION);
        let mut last = fade.value();
        while !fade.is_complete() {
            fade.tick(MS_16);
            assert!(fade.value() <= last + 1e-12);
            last = fade.value();
        }
    }

    #[test]
    fn velocity_sign_follows_direction() {
        let mut up = Timing::new(0.0, 1.0, DEFAULT_TIMING_DURATION);
        let mut down = Timing::new(1.0, 0.0, DEFAULT_TIMING_DURATION);
        up.tick(Duration::from_millis(100));
        down.tick(Duration::from_millis(100));
        assert!(up.velocity() > 0.0);
        assert!(down.velocity() < 0.0);
    }
}
