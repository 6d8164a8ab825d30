#![forbid(unsafe_code)]

//! Release-velocity estimation for drag gestures.
//!
//! [`VelocityTracker1D`] keeps a small ring buffer of timestamped positions
//! and estimates velocity with the impulse strategy: each segment between
//! consecutive samples contributes the kinetic energy needed to change the
//! pointer's speed, and the accumulated energy is converted back into a
//! velocity. This is robust to the jittery, irregular sample spacing of
//! touch input.
//!
//! # Invariants
//!
//! 1. Only samples within [`HORIZON_MS`] of the newest sample contribute.
//! 2. A gap larger than [`ASSUME_STOPPED_MS`] means the pointer stopped;
//!    older samples are ignored.
//! 3. Fewer than two usable samples yields `0.0`.

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms are considered.
pub const HORIZON_MS: i64 = 100;

/// If no movement for this long, the pointer is assumed to have stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    time_ms: i64,
    position: f64,
}

/// 1-D velocity tracker over absolute positions.
///
/// ```
/// use vfit_core::velocity::VelocityTracker1D;
///
/// let mut tracker = VelocityTracker1D::new();
/// tracker.add_sample(0, 600.0);
/// tracker.add_sample(10, 540.0);
/// tracker.add_sample(20, 480.0);
/// assert!(tracker.velocity() < -5000.0);
/// ```
#[derive(Debug, Clone)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Record the pointer `position` at `time_ms`.
    pub fn add_sample(&mut self, time_ms: i64, position: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Estimated velocity in position units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut positions = [0.0f64; HISTORY_SIZE];
        let mut times = [0.0f64; HISTORY_SIZE];
        let mut count = 0;
        let mut cursor = self.index;
        let mut previous_age = 0i64;

        while let Some(sample) = self.samples[cursor] {
            let age = newest.time_ms - sample.time_ms;
            if age > HORIZON_MS || age - previous_age > ASSUME_STOPPED_MS {
                break;
            }
            previous_age = age;

            positions[count] = sample.position;
            times[count] = -(age as f64);
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }

            cursor = if cursor == 0 { HISTORY_SIZE - 1 } else { cursor - 1 };
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions[..count], &times[..count]) * 1000.0
    }

    /// Estimated velocity clamped to `[-max, max]`.
    ///
    /// A non-finite or non-positive `max` yields `0.0`.
    #[must_use]
    pub fn velocity_with_max(&self, max: f64) -> f64 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max, max)
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse-strategy velocity (units per ms).
///
/// `positions` and `times` are ordered newest first; times are non-positive
/// offsets from the newest sample.
fn impulse_velocity(positions: &[f64], times: &[f64]) -> f64 {
    let start = positions.len() - 1;
    let mut work = 0.0f64;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let v_curr = (positions[i] - positions[i - 1]) / (current_time - next_time);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    energy_to_velocity(work)
}

/// E = ½·v² with unit mass.
#[inline]
fn energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}
