#![forbid(unsafe_code)]

//! Scoped observable overrides.
//!
//! A screen that wants a different snap cap or no backdrop acquires a
//! [`ScopedOverride`] on mount. Dropping the guard on unmount writes the
//! previous value back, so screens never have to remember to undo their
//! settings.

use tracing::debug;

use crate::reactive::Observable;

/// Holds an observable at an overridden value until dropped.
///
/// Overrides nest: each guard restores the value that was current when it
/// was acquired. Guards are expected to drop in reverse acquisition order,
/// as screen lifetimes do.
#[must_use = "dropping the guard restores the previous value immediately"]
pub struct ScopedOverride<T: Clone + PartialEq + 'static> {
    target: Observable<T>,
    previous: T,
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> ScopedOverride<T> {
    /// Set `target` to `value`, remembering the current value.
    pub fn acquire(target: &Observable<T>, value: T) -> Self {
        let previous = target.get();
        debug!(?previous, next = ?value, "scoped override acquired");
        target.set(value);
        Self {
            target: target.clone(),
            previous,
        }
    }

    /// The value that will be restored on drop.
    #[must_use]
    pub fn previous(&self) -> &T {
        &self.previous
    }
}

impl<T: Clone + PartialEq + 'static> Drop for ScopedOverride<T> {
    fn drop(&mut self) {
        self.target.set(self.previous.clone());
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for ScopedOverride<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedOverride")
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_on_drop() {
        let show_backdrop = Observable::new(true);
        {
            let _guard = ScopedOverride::acquire(&show_backdrop, false);
            assert!(!show_backdrop.get());
        }
        assert!(show_backdrop.get());
    }

    #[test]
    fn nested_overrides_unwind() {
        let cap = Observable::new(2u8);
        let outer = ScopedOverride::acquire(&cap, 1);
        let inner = ScopedOverride::acquire(&cap, 0);
        assert_eq!(cap.get(), 0);
        assert_eq!(*inner.previous(), 1);
        drop(inner);
        assert_eq!(cap.get(), 1);
        drop(outer);
        assert_eq!(cap.get(), 2);
    }

    #[test]
    fn same_value_override_does_not_notify() {
        let flag = Observable::new(true);
        let guard = ScopedOverride::acquire(&flag, true);
        drop(guard);
        assert_eq!(flag.version(), 0);
    }
}
