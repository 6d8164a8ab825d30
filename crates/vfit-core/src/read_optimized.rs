#![forbid(unsafe_code)]

//! Wait-free publication of per-frame state to other threads.
//!
//! The sheet controller lives on the UI thread, but a renderer may
//! interpolate on a thread of its own. The controller publishes a small
//! snapshot (offset, open flag, backdrop) after every change; readers load
//! the latest snapshot every frame. Reads vastly outnumber writes and must
//! never observe half of one write and half of another.
//!
//! [`ReadOptimized<T>`] abstracts the store; [`ArcSwapStore`] is the
//! implementation, built on [`arc_swap::ArcSwap`].
//!
//! # Constraints
//!
//! - `#![forbid(unsafe_code)]`; all atomics live inside `arc-swap`.
//! - `T: Clone + Send + Sync`.
//! - Reads do not allocate; each write allocates one `Arc`.
//!
//! # Example
//!
//! ```
//! use vfit_core::read_optimized::{ArcSwapStore, ReadOptimized};
//!
//! let store = ArcSwapStore::new(0.0_f64);
//! store.store(-560.0);
//! assert_eq!(store.load(), -560.0);
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;

/// A concurrent store optimized for read-heavy access.
///
/// Implementations must guarantee:
/// - `load()` never blocks writers.
/// - `load()` returns a value that was stored as a whole (no torn reads).
/// - `store()` is atomic with respect to concurrent `load()` calls.
pub trait ReadOptimized<T: Clone + Send + Sync>: Send + Sync {
    /// Read the current value.
    fn load(&self) -> T;

    /// Atomically replace the stored value.
    fn store(&self, val: T);
}

/// Wait-free reads via [`arc_swap::ArcSwap`].
pub struct ArcSwapStore<T> {
    inner: ArcSwap<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ArcSwapStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcSwapStore")
            .field("value", &**self.inner.load())
            .finish()
    }
}

impl<T: Clone + Send + Sync> ArcSwapStore<T> {
    /// Create a store holding `val`.
    pub fn new(val: T) -> Self {
        Self {
            inner: ArcSwap::from_pointee(val),
        }
    }

    /// Read without cloning; the guard derefs to `Arc<T>`.
    pub fn load_ref(&self) -> arc_swap::Guard<Arc<T>> {
        self.inner.load()
    }

    /// Replace the value with `f(current)`.
    ///
    /// Retries if another writer raced in between, so `f` may run more
    /// than once and must be pure.
    pub fn update(&self, f: impl Fn(&T) -> T) {
        self.inner.rcu(|current| Arc::new(f(current)));
    }
}

impl<T: Clone + Send + Sync> ReadOptimized<T> for ArcSwapStore<T> {
    #[inline]
    fn load(&self) -> T {
        let guard = self.inner.load();
        T::clone(&guard)
    }

    #[inline]
    fn store(&self, val: T) {
        self.inner.store(Arc::new(val));
    }
}
