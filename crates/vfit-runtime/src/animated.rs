#![forbid(unsafe_code)]

//! A scalar observable driven by one animation at a time.
//!
//! [`AnimatedValue`] pairs an [`Observable<f64>`] with at most one running
//! [`Animation`]. Each `tick(dt)` advances the animation and publishes its
//! value through the observable, so subscribers see every frame.
//!
//! # Interruption
//!
//! Starting a new animation, calling [`AnimatedValue::stop`], or writing a
//! value with [`AnimatedValue::set_immediate`] resolves the running
//! animation's [`Completion`] as [`AnimationOutcome::Interrupted`]. A spring
//! started with [`AnimatedValue::spring_to`] inherits the velocity of the
//! animation it replaces, so a re-targeted sheet keeps its momentum.
//!
//! # Re-entrancy
//!
//! No borrow of the internal state is held while subscribers or completion
//! continuations run. A continuation may start the next animation on the
//! same value.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;
use vfit_core::animation::{Animation, Spring, SpringSpec, Timing};

use crate::completion::{AnimationOutcome, Completion, CompletionSource};
use crate::reactive::{Observable, Subscription};

struct Running {
    animation: Box<dyn Animation>,
    source: CompletionSource,
}

/// An animatable `f64`. Cloning shares the value and its running animation.
#[derive(Clone)]
pub struct AnimatedValue {
    value: Observable<f64>,
    running: Rc<RefCell<Option<Running>>>,
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("value", &self.value.get())
            .field("animating", &self.is_animating())
            .finish()
    }
}

impl AnimatedValue {
    /// Create a resting value.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: Observable::new(initial),
            running: Rc::new(RefCell::new(None)),
        }
    }

    /// The underlying observable, for subscriptions and derivations.
    #[must_use]
    pub fn observable(&self) -> &Observable<f64> {
        &self.value
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    /// Subscribe to value changes.
    pub fn subscribe(&self, callback: impl Fn(&f64) + 'static) -> Subscription {
        self.value.subscribe(callback)
    }

    /// Whether an animation is currently running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.running.borrow().is_some()
    }

    /// Target of the running animation, if any.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.running.borrow().as_ref().map(|r| r.animation.target())
    }

    /// Velocity of the running animation, or zero at rest.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.running
            .borrow()
            .as_ref()
            .map_or(0.0, |r| r.animation.velocity())
    }

    /// Stop any animation and jump to `value`.
    pub fn set_immediate(&self, value: f64) {
        self.stop();
        self.value.set(value);
    }

    /// Stop the running animation where it is.
    ///
    /// Its completion resolves as [`AnimationOutcome::Interrupted`].
    pub fn stop(&self) {
        let previous = self.running.borrow_mut().take();
        if let Some(previous) = previous {
            trace!(value = self.value.get(), "animation stopped");
            previous.source.resolve(AnimationOutcome::Interrupted);
        }
    }

    /// Run `animation`, replacing any running one.
    pub fn animate(&self, animation: impl Animation + 'static) -> Completion {
        let source = CompletionSource::new();
        let completion = source.completion();
        let previous = self.running.borrow_mut().replace(Running {
            animation: Box::new(animation),
            source,
        });
        if let Some(previous) = previous {
            previous.source.resolve(AnimationOutcome::Interrupted);
        }
        completion
    }

    /// Spring from the current value and velocity toward `target`.
    pub fn spring_to(&self, target: f64, spec: SpringSpec) -> Completion {
        let spring = Spring::new(self.get(), target, spec).with_velocity(self.velocity());
        trace!(from = self.get(), target, "spring started");
        self.animate(spring)
    }

    /// Eased, fixed-duration transition from the current value to `target`.
    pub fn timing_to(&self, target: f64, duration: Duration) -> Completion {
        self.animate(Timing::new(self.get(), target, duration))
    }

    /// Advance the running animation by `dt`.
    ///
    /// Returns `true` while an animation is still running afterwards.
    pub fn tick(&self, dt: Duration) -> bool {
        let (value, finished) = {
            let mut slot = self.running.borrow_mut();
            let Some(running) = slot.as_mut() else {
                return false;
            };
            running.animation.tick(dt);
            let value = running.animation.value();
            if running.animation.is_complete() {
                (value, slot.take())
            } else {
                (value, None)
            }
        };

        self.value.set(value);
        if let Some(finished) = finished {
            trace!(value, "animation finished");
            finished.source.resolve(AnimationOutcome::Finished);
        }
        self.is_animating()
    }
}
