//! Reactive values: observables and derived computations.

pub mod derived;
pub mod observable;

pub use derived::Derived;
pub use observable::{Observable, Subscription};
