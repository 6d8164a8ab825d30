#![forbid(unsafe_code)]

//! Values derived from observables by pure functions.
//!
//! A [`Derived<T>`] owns an output [`Observable<T>`] and subscriptions to
//! its sources. Whenever a source changes, the derivation is recomputed and
//! written to the output; the output's own `PartialEq` check means
//! downstream subscribers only hear about real changes.
//!
//! The backdrop style (opacity target and stacking layer) is a derived value
//! of the sheet's open flag and the screen's backdrop toggle.

use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// A read-only value recomputed from one or two source observables.
pub struct Derived<T> {
    output: Observable<T>,
    sources: Vec<Subscription>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("output", &self.output)
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Derived<T> {
    /// Derive from a single source.
    pub fn map<S>(source: &Observable<S>, f: impl Fn(&S) -> T + 'static) -> Self
    where
        S: Clone + PartialEq + 'static,
    {
        let output = Observable::new(source.with(&f));
        let out = output.clone();
        let sub = source.subscribe(move |s| out.set(f(s)));
        Self {
            output,
            sources: vec![sub],
        }
    }

    /// Derive from two sources. Recomputed when either changes.
    pub fn combine<A, B>(
        a: &Observable<A>,
        b: &Observable<B>,
        f: impl Fn(&A, &B) -> T + 'static,
    ) -> Self
    where
        A: Clone + PartialEq + 'static,
        B: Clone + PartialEq + 'static,
    {
        let f = Rc::new(f);
        let output = Observable::new(a.with(|va| b.with(|vb| f(va, vb))));

        let sub_a = {
            let out = output.clone();
            let b = b.clone();
            let f = Rc::clone(&f);
            a.subscribe(move |va| {
                let next = b.with(|vb| f(va, vb));
                out.set(next);
            })
        };
        let sub_b = {
            let out = output.clone();
            let a = a.clone();
            let f = Rc::clone(&f);
            b.subscribe(move |vb| {
                let next = a.with(|va| f(va, vb));
                out.set(next);
            })
        };

        Self {
            output,
            sources: vec![sub_a, sub_b],
        }
    }

    /// Current derived value.
    #[must_use]
    pub fn get(&self) -> T {
        self.output.get()
    }

    /// Subscribe to changes of the derived value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.output.subscribe(callback)
    }

    /// Version of the derived output; increments only on real changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.output.version()
    }

    /// Read-only handle to the output observable.
    ///
    /// Writes through this handle are overwritten on the next source change.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn map_tracks_source() {
        let offset = Observable::new(0.0_f64);
        let raised = Derived::map(&offset, |y| *y < 0.0);
        assert!(!raised.get());

        offset.set(-120.0);
        assert!(raised.get());
    }

    #[test]
    fn map_only_bumps_version_on_real_change() {
        let offset = Observable::new(-10.0_f64);
        let raised = Derived::map(&offset, |y| *y < 0.0);
        offset.set(-20.0);
        offset.set(-30.0);
        assert_eq!(raised.version(), 0);
        offset.set(0.0);
        assert_eq!(raised.version(), 1);
    }

    #[test]
    fn combine_recomputes_on_either_source() {
        let open = Observable::new(false);
        let show = Observable::new(true);
        let opacity = Derived::combine(&open, &show, |o, s| if *o && *s { 0.7 } else { 0.0 });

        assert_eq!(opacity.get(), 0.0);
        open.set(true);
        assert_eq!(opacity.get(), 0.7);
        show.set(false);
        assert_eq!(opacity.get(), 0.0);
    }

    #[test]
    fn derived_subscribers_fire_once_per_change() {
        let open = Observable::new(false);
        let show = Observable::new(true);
        let visible = Derived::combine(&open, &show, |o, s| *o && *s);
        let fired = std::rc::Rc::new(Cell::new(0));
        let _sub = {
            let fired = std::rc::Rc::clone(&fired);
            visible.subscribe(move |_| fired.set(fired.get() + 1))
        };

        open.set(true);
        show.set(true);
        show.set(false);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn dropping_derived_releases_source_subscription() {
        let source = Observable::new(1);
        let doubled = Derived::map(&source, |v| v * 2);
        assert_eq!(doubled.get(), 2);
        drop(doubled);
        source.set(2);
        assert_eq!(source.subscriber_count(), 0);
    }
}
