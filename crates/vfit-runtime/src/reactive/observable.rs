#![forbid(unsafe_code)]

//! Shared values that notify subscribers when they change.
//!
//! The sheet offset, the open flag, and each screen's snap settings live in
//! an [`Observable<T>`]; views subscribe to them rather than poll. Handles
//! share one `Rc<RefCell<..>>` cell, and a write that compares equal to the
//! stored value (`PartialEq`) is dropped without notifying anyone.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: if [`Subscription`] guards are kept forever,
//!   callbacks accumulate. Dead weak references are pruned lazily during
//!   notification.
//! - **Re-entrant set**: a subscriber may call `set()` on the same
//!   observable; no borrow is held while callbacks run, so the nested
//!   notification runs to completion before the outer loop continues.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{trace, trace_span};
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A value cell with a change counter and subscribers.
///
/// Cloning an `Observable` creates a new handle to the **same** state.
///
/// # Invariants
///
/// 1. Each write that changes the value bumps `version` by one.
/// 2. Writing the current value does nothing.
/// 3. Callbacks run in the order they subscribed.
/// 4. Dropped [`Subscription`]s are never called again.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe to changes. The callback receives each new value.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version number; increments on each change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Whether two handles share the same state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> = inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (callbacks, inner.value.clone())
        };

        if callbacks.is_empty() {
            return;
        }

        let started = Instant::now();
        let _span = trace_span!("vfit.propagate", subscribers = callbacks.len()).entered();
        for cb in &callbacks {
            cb(&value);
        }
        trace!(
            duration_us = started.elapsed().as_micros() as u64,
            "observable propagation"
        );
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it drops the only strong reference to the callback, so the
/// observable's weak entry fails to upgrade on the next notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn get_set_basic() {
        let obs = Observable::new(0.0_f64);
        assert_eq!(obs.get(), 0.0);
        assert_eq!(obs.version(), 0);

        obs.set(-240.0);
        assert_eq!(obs.get(), -240.0);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn same_value_is_noop() {
        let obs = Observable::new(true);
        obs.set(true);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn update_mutates_in_place() {
        let obs = Observable::new(vec![1, 2]);
        obs.update(|v| v.push(3));
        assert_eq!(obs.get(), vec![1, 2, 3]);
        assert_eq!(obs.version(), 1);

        obs.update(|v| v.retain(|_| true));
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn subscribers_see_new_value_in_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = {
            let log = Rc::clone(&log);
            obs.subscribe(move |v| log.borrow_mut().push(("a", *v)))
        };
        let b = {
            let log = Rc::clone(&log);
            obs.subscribe(move |v| log.borrow_mut().push(("b", *v)))
        };

        obs.set(7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let sub = {
            let count = Rc::clone(&count);
            obs.subscribe(move |_| count.set(count.get() + 1))
        };
        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(1);
        let b = a.clone();
        b.set(5);
        assert_eq!(a.get(), 5);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Observable::new(5)));
    }

    #[test]
    fn reentrant_set_from_subscriber() {
        let obs = Observable::new(0);
        let inner = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v < 3 {
                inner.set(*v + 1);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 3);
    }

    struct SpanCounter {
        next_id: AtomicU64,
        propagations: Arc<Mutex<u64>>,
    }

    impl tracing::Subscriber for SpanCounter {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            if attrs.metadata().name() == "vfit.propagate" {
                *self.propagations.lock().expect("span counter lock") += 1;
            }
            tracing::span::Id::from_u64(self.next_id.fetch_add(1, Ordering::Relaxed))
        }

        fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

        fn event(&self, _event: &tracing::Event<'_>) {}

        fn enter(&self, _span: &tracing::span::Id) {}

        fn exit(&self, _span: &tracing::span::Id) {}
    }

    #[test]
    fn propagation_emits_one_span_per_change() {
        let propagations = Arc::new(Mutex::new(0));
        let subscriber = SpanCounter {
            next_id: AtomicU64::new(1),
            propagations: Arc::clone(&propagations),
        };
        let _guard = tracing::subscriber::set_default(subscriber);

        let obs = Observable::new(0);
        let _sub = obs.subscribe(|_| {});
        obs.set(1);
        obs.set(1);
        obs.set(2);

        assert_eq!(*propagations.lock().expect("span counter lock"), 2);
    }
}
