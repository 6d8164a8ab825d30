#![forbid(unsafe_code)]

//! Core: animation primitives, drag recognition, and frame publication.
//!
//! # Role in VirtualFit
//! `vfit-core` holds the pieces of the store sheet that have no notion of
//! screens or snap points. Everything here is plain data plus `tick(dt)`
//! style stepping, so it can be driven by any frame loop and tested
//! deterministically.
//!
//! # Primary responsibilities
//! - **Animation**: [`animation::Spring`] (damped oscillator with mass) and
//!   [`animation::Timing`] (eased, fixed-duration interpolation) behind the
//!   [`animation::Animation`] trait.
//! - **Velocity**: [`velocity::VelocityTracker1D`], an impulse-strategy
//!   estimator for release velocity.
//! - **Gestures**: [`gesture::DragRecognizer`] turns raw vertical pointer
//!   samples into drag start/update/end events.
//! - **Publication**: [`read_optimized::ArcSwapStore`] lets a render thread
//!   read the latest sheet frame without locking the UI thread.
//!
//! # How it fits in the system
//! `vfit-runtime` wraps animations into observable animated values, and
//! `vfit-sheet` feeds drag events into the snap controller.

pub mod animation;
pub mod gesture;
pub mod read_optimized;
pub mod velocity;
