#![forbid(unsafe_code)]

//! Animation primitives for sheet motion.
//!
//! All animations here animate a single signed scalar (a sheet offset or a
//! backdrop opacity) and are advanced explicitly with [`Animation::tick`].
//! Nothing in this module reads a clock; the caller owns time.
//!
//! | Type | Motion | Completes when |
//! |------|--------|----------------|
//! | [`Spring`] | damped harmonic oscillator | displacement and speed fall under rest thresholds |
//! | [`Timing`] | eased interpolation over a fixed duration | elapsed >= duration |

pub mod spring;
pub mod timing;

use std::time::Duration;

pub use spring::{Spring, SpringSpec};
pub use timing::Timing;

/// An easing curve mapping linear progress `t` in `[0, 1]` to eased progress.
pub type EasingFn = fn(f64) -> f64;

/// A steppable animation of one scalar value.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its target and stopped moving.
    fn is_complete(&self) -> bool;

    /// Current animated value.
    fn value(&self) -> f64;

    /// Current rate of change in value units per second.
    ///
    /// Used to hand momentum over when one animation replaces another.
    fn velocity(&self) -> f64 {
        0.0
    }

    /// Value the animation is heading toward.
    fn target(&self) -> f64;
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn tick(&mut self, dt: Duration) {
        (**self).tick(dt);
    }

    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }

    fn value(&self) -> f64 {
        (**self).value()
    }

    fn velocity(&self) -> f64 {
        (**self).velocity()
    }

    fn target(&self) -> f64 {
        (**self).target()
    }
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out. Default curve for timed fades.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
