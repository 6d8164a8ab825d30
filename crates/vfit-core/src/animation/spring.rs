#![forbid(unsafe_code)]

//! Spring-driven motion for the sheet offset.
//!
//! Drives the sheet offset toward its snap destination with physically-based
//! motion:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength.
//! - **damping** (c): velocity drag.
//!   - Underdamped (c < 2√(k·m)): overshoots before settling
//!   - Critically damped (c ≈ 2√(k·m)): fastest convergence without overshoot
//!   - Overdamped (c > 2√(k·m)): slower convergence, no overshoot
//! - **mass** (m): inertia. Higher = slower response for the same forces.
//!
//! The sheet default (damping 50, stiffness 200, mass 1) is overdamped: the
//! panel glides onto its snap point without bouncing past it.
//!
//! # Invariants
//!
//! 1. `value()` is the raw signed position; sheet offsets are negative.
//! 2. Once at rest a spring stays put. A new destination gets a new spring,
//!    seeded with the old one's velocity.
//! 3. Stiffness and mass are always positive and damping is never negative.
//!
//! # Failure Modes
//!
//! - Very large dt: integration is subdivided into steps of at most 4ms.
//! - Zero stiffness or mass: clamped to a small minimum so the spring
//!   still converges.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Displacement (in value units) below which the spring may come to rest.
const REST_DISPLACEMENT: f64 = 0.01;

/// Speed (value units per second) below which the spring may come to rest.
const REST_SPEED: f64 = 2.0;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Minimum mass to prevent division by zero.
const MIN_MASS: f64 = 0.01;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringSpec {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
}

impl Default for SpringSpec {
    /// The store sheet spring: damping 50, stiffness 200, mass 1.
    fn default() -> Self {
        Self {
            damping: 50.0,
            stiffness: 200.0,
            mass: 1.0,
        }
    }
}

impl SpringSpec {
    /// Damping coefficient at which this spring is critically damped.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness.max(MIN_STIFFNESS) * self.mass.max(MIN_MASS)).sqrt()
    }

    /// Damping ratio ζ = c / c_critical. `>= 1.0` means no overshoot.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping.max(0.0) / self.critical_damping()
    }
}

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vfit_core::animation::{Animation, Spring, SpringSpec};
///
/// let mut spring = Spring::new(0.0, -560.0, SpringSpec::default());
/// for _ in 0..600 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.is_complete());
/// assert!((spring.value() + 560.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64, spec: SpringSpec) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: spec.stiffness.max(MIN_STIFFNESS),
            damping: spec.damping.max(0.0),
            mass: spec.mass.max(MIN_MASS),
            at_rest: false,
        }
    }

    /// Start with a non-zero velocity (builder pattern).
    ///
    /// Used when a spring takes over from a drag release or from another
    /// in-flight animation.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Single semi-implicit Euler step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.stiffness * displacement;
        let damping_force = -self.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        if pos_delta < REST_DISPLACEMENT && self.velocity.abs() < REST_SPEED {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn target(&self) -> f64 {
        self.target
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
