#![forbid(unsafe_code)]

//! Runtime: reactive values and animation driving for the UI thread.
//!
//! # Role in VirtualFit
//! `vfit-runtime` is the glue between the pure primitives in `vfit-core`
//! and the sheet controller. It owns the single-threaded value graph:
//!
//! - [`Observable`]: a shared, versioned value with change subscriptions.
//! - [`Derived`]: a value recomputed from one or two observables by a pure
//!   function whenever a source changes.
//! - [`AnimatedValue`]: an observable `f64` driven by a spring or timing
//!   animation; each animation hands back a [`Completion`].
//! - [`ScopedOverride`]: an RAII guard that sets an observable for the
//!   lifetime of a screen and restores the previous value on drop.
//!
//! Everything here is `!Send`: writes and reads happen on the same
//! cooperative thread. Cross-thread readers use
//! `vfit_core::read_optimized` snapshots instead.

pub mod animated;
pub mod completion;
pub mod reactive;
pub mod scope;

pub use animated::AnimatedValue;
pub use completion::{AnimationOutcome, Completion, CompletionSource};
pub use reactive::{Derived, Observable, Subscription};
pub use scope::ScopedOverride;
