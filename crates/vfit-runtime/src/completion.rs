#![forbid(unsafe_code)]

//! Completion signals for animations.
//!
//! Starting an animation on an [`AnimatedValue`](crate::AnimatedValue)
//! returns a [`Completion`]. The animation side holds the matching
//! [`CompletionSource`] and resolves it exactly once: `Finished` when the
//! animation settles, `Interrupted` when another animation replaced it or
//! it was stopped.
//!
//! Work that must wait for the motion to end (resetting panel contents
//! after the close animation, for instance) is chained with
//! [`Completion::then`] instead of guessing a timer.
//!
//! # Invariants
//!
//! 1. A source resolves at most once; later calls are ignored.
//! 2. Continuations run in registration order, exactly once.
//! 3. A continuation registered after resolution runs immediately.
//! 4. No borrow is held while continuations run, so they may start new
//!    animations.

use std::cell::RefCell;
use std::rc::Rc;

/// How an animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// Reached its target and came to rest.
    Finished,
    /// Replaced or stopped before reaching its target.
    Interrupted,
}

impl AnimationOutcome {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

type Continuation = Box<dyn FnOnce(AnimationOutcome)>;

#[derive(Default)]
struct CompletionInner {
    outcome: Option<AnimationOutcome>,
    continuations: Vec<Continuation>,
}

/// Observer side of a completion signal. Cheap to clone.
#[derive(Clone)]
pub struct Completion {
    inner: Rc<RefCell<CompletionInner>>,
}

/// Resolver side of a completion signal.
pub struct CompletionSource {
    inner: Rc<RefCell<CompletionInner>>,
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Completion")
            .field("outcome", &inner.outcome)
            .field("pending_continuations", &inner.continuations.len())
            .finish()
    }
}

impl std::fmt::Debug for CompletionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSource")
            .field("outcome", &self.inner.borrow().outcome)
            .finish()
    }
}

impl CompletionSource {
    /// Create an unresolved source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(CompletionInner::default())),
        }
    }

    /// A completion handle observing this source.
    #[must_use]
    pub fn completion(&self) -> Completion {
        Completion {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Resolve with `outcome` and run pending continuations.
    pub fn resolve(&self, outcome: AnimationOutcome) {
        let continuations = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                return;
            }
            inner.outcome = Some(outcome);
            std::mem::take(&mut inner.continuations)
        };
        for continuation in continuations {
            continuation(outcome);
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().outcome.is_some()
    }
}

impl Default for CompletionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    /// A completion that is already resolved.
    #[must_use]
    pub fn resolved(outcome: AnimationOutcome) -> Self {
        let source = CompletionSource::new();
        source.resolve(outcome);
        source.completion()
    }

    /// Run `f` when the animation ends (immediately if it already has).
    pub fn then(&self, f: impl FnOnce(AnimationOutcome) + 'static) {
        let resolved = self.inner.borrow().outcome;
        match resolved {
            Some(outcome) => f(outcome),
            None => self.inner.borrow_mut().continuations.push(Box::new(f)),
        }
    }

    /// Run `f` only if the animation finishes (not if it is interrupted).
    pub fn on_finished(&self, f: impl FnOnce() + 'static) {
        self.then(move |outcome| {
            if outcome.is_finished() {
                f();
            }
        });
    }

    /// The outcome, if resolved.
    #[must_use]
    pub fn outcome(&self) -> Option<AnimationOutcome> {
        self.inner.borrow().outcome
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome().is_some()
    }
}
