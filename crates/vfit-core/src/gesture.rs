#![forbid(unsafe_code)]

//! Vertical drag recognition: raw pointer samples to drag events.
//!
//! [`DragRecognizer`] is a small state machine fed with [`PointerEvent`]s
//! and a timestamp. It emits [`DragEvent`]s that the sheet controller
//! consumes: `Start`, continuous `Update`s carrying the cumulative
//! translation since the finger went down, and `End` with the release
//! velocity.
//!
//! # State Machine
//!
//! ```text
//!   Idle --Down--> Pressed --Move beyond slop--> Dragging
//!    ^                |                            |
//!    +-----Up/Cancel--+<--------Up/Cancel----------+
//! ```
//!
//! # Invariants
//!
//! 1. `Start` is always followed by zero or more `Update`s and exactly one
//!    `End`, unless [`DragRecognizer::reset`] is called mid-drag.
//! 2. A press released before crossing the touch slop emits nothing.
//! 3. Translation is measured from the press position, not from where the
//!    slop was crossed, so the panel tracks the finger exactly.
//! 4. `Cancel` during a drag emits `End` with zero velocity so the panel
//!    still settles on a snap point.

use tracing::debug;
use web_time::Instant;

use crate::velocity::VelocityTracker1D;

/// Default touch slop in logical pixels.
pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;

/// Default maximum release velocity in logical pixels per second.
pub const DEFAULT_MAX_FLING_VELOCITY: f64 = 8_000.0;

/// Thresholds for drag recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Distance the pointer must travel before a drag starts.
    pub touch_slop: f64,
    /// Release velocities are clamped to `[-max, max]`.
    pub max_fling_velocity: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
        }
    }
}

/// Raw vertical pointer input. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { y: f64 },
    Move { y: f64 },
    Up { y: f64 },
    Cancel,
}

/// Recognized drag gesture events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// The pointer crossed the touch slop.
    Start,
    /// Cumulative translation since the press (negative = upward).
    Update { translation: f64 },
    /// The drag ended; `velocity` is in pixels per second (negative = upward).
    End { translation: f64, velocity: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pressed { origin_y: f64, down_at: Instant },
    Dragging { origin_y: f64, down_at: Instant, last_y: f64 },
}

/// Stateful recognizer for one vertical drag at a time.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    config: DragConfig,
    phase: Phase,
    tracker: VelocityTracker1D,
}

impl Default for DragRecognizer {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragRecognizer {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            tracker: VelocityTracker1D::new(),
        }
    }

    /// Feed one pointer event observed at `now`.
    pub fn process(&mut self, event: PointerEvent, now: Instant) -> Vec<DragEvent> {
        match (event, self.phase) {
            (PointerEvent::Down { y }, _) => {
                self.tracker.reset();
                self.tracker.add_sample(0, y);
                self.phase = Phase::Pressed {
                    origin_y: y,
                    down_at: now,
                };
                Vec::new()
            }
            (PointerEvent::Move { y }, Phase::Pressed { origin_y, down_at }) => {
                self.tracker.add_sample(elapsed_ms(down_at, now), y);
                if (y - origin_y).abs() <= self.config.touch_slop {
                    return Vec::new();
                }
                debug!(origin_y, y, "drag started");
                self.phase = Phase::Dragging {
                    origin_y,
                    down_at,
                    last_y: y,
                };
                vec![
                    DragEvent::Start,
                    DragEvent::Update {
                        translation: y - origin_y,
                    },
                ]
            }
            (
                PointerEvent::Move { y },
                Phase::Dragging {
                    origin_y, down_at, ..
                },
            ) => {
                self.tracker.add_sample(elapsed_ms(down_at, now), y);
                self.phase = Phase::Dragging {
                    origin_y,
                    down_at,
                    last_y: y,
                };
                vec![DragEvent::Update {
                    translation: y - origin_y,
                }]
            }
            (
                PointerEvent::Up { y },
                Phase::Dragging {
                    origin_y, down_at, ..
                },
            ) => {
                self.tracker.add_sample(elapsed_ms(down_at, now), y);
                let velocity = self
                    .tracker
                    .velocity_with_max(self.config.max_fling_velocity);
                self.phase = Phase::Idle;
                debug!(translation = y - origin_y, velocity, "drag released");
                vec![DragEvent::End {
                    translation: y - origin_y,
                    velocity,
                }]
            }
            (PointerEvent::Cancel, Phase::Dragging { origin_y, last_y, .. }) => {
                self.phase = Phase::Idle;
                debug!(translation = last_y - origin_y, "drag cancelled");
                vec![DragEvent::End {
                    translation: last_y - origin_y,
                    velocity: 0.0,
                }]
            }
            (PointerEvent::Up { .. } | PointerEvent::Cancel, _) => {
                self.phase = Phase::Idle;
                Vec::new()
            }
            (PointerEvent::Move { .. }, Phase::Idle) => Vec::new(),
        }
    }

    /// Whether a drag is in progress (slop crossed, pointer still down).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Drop any in-progress press or drag without emitting events.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.tracker.reset();
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }
}

fn elapsed_ms(since: Instant, now: Instant) -> i64 {
    now.saturating_duration_since(since).as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn press_and_release_within_slop_is_silent() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        assert!(rec.process(PointerEvent::Down { y: 500.0 }, t0).is_empty());
        assert!(rec.process(PointerEvent::Move { y: 504.0 }, at(t0, 16)).is_empty());
        assert!(rec.process(PointerEvent::Up { y: 504.0 }, at(t0, 32)).is_empty());
        assert!(!rec.is_dragging());
    }

    #[test]
    fn crossing_slop_emits_start_then_update() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 500.0 }, t0);
        let events = rec.process(PointerEvent::Move { y: 480.0 }, at(t0, 16));
        assert_eq!(
            events,
            vec![DragEvent::Start, DragEvent::Update { translation: -20.0 }]
        );
        assert!(rec.is_dragging());
    }

    #[test]
    fn translation_is_cumulative_from_press() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 500.0 }, t0);
        rec.process(PointerEvent::Move { y: 450.0 }, at(t0, 16));
        let events = rec.process(PointerEvent::Move { y: 300.0 }, at(t0, 32));
        assert_eq!(events, vec![DragEvent::Update { translation: -200.0 }]);
    }

    #[test]
    fn quick_upward_flick_reports_negative_velocity() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 700.0 }, t0);
        for (i, y) in [650.0, 600.0, 550.0, 500.0].into_iter().enumerate() {
            rec.process(PointerEvent::Move { y }, at(t0, 10 * (i as u64 + 1)));
        }
        let events = rec.process(PointerEvent::Up { y: 450.0 }, at(t0, 50));
        let &[DragEvent::End { translation, velocity }] = events.as_slice() else {
            panic!("expected a single End event, got {events:?}");
        };
        assert!((translation + 250.0).abs() < f64::EPSILON);
        assert!(velocity < -500.0, "velocity {velocity}");
        assert!(!rec.is_dragging());
    }

    #[test]
    fn velocity_is_capped_by_config() {
        let mut rec = DragRecognizer::new(DragConfig {
            touch_slop: 1.0,
            max_fling_velocity: 1_000.0,
        });
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 800.0 }, t0);
        rec.process(PointerEvent::Move { y: 600.0 }, at(t0, 5));
        let events = rec.process(PointerEvent::Up { y: 400.0 }, at(t0, 10));
        assert_eq!(
            events,
            vec![DragEvent::End {
                translation: -400.0,
                velocity: -1_000.0
            }]
        );
    }

    #[test]
    fn cancel_mid_drag_ends_with_zero_velocity() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 300.0 }, t0);
        rec.process(PointerEvent::Move { y: 380.0 }, at(t0, 16));
        let events = rec.process(PointerEvent::Cancel, at(t0, 32));
        assert_eq!(
            events,
            vec![DragEvent::End {
                translation: 80.0,
                velocity: 0.0
            }]
        );
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut rec = DragRecognizer::default();
        assert!(
            rec.process(PointerEvent::Move { y: 10.0 }, Instant::now())
                .is_empty()
        );
    }

    #[test]
    fn reset_drops_active_drag() {
        let mut rec = DragRecognizer::default();
        let t0 = Instant::now();
        rec.process(PointerEvent::Down { y: 300.0 }, t0);
        rec.process(PointerEvent::Move { y: 200.0 }, at(t0, 16));
        rec.reset();
        assert!(!rec.is_dragging());
        assert!(rec.process(PointerEvent::Up { y: 200.0 }, at(t0, 32)).is_empty());
    }
}
