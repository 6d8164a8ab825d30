#![forbid(unsafe_code)]

//! Sheet: the VirtualFit store panel's snap-point controller.
//!
//! # Role in VirtualFit
//! The store panel slides up from the bottom of every store screen. It
//! rests at one of three tiers (closed, mid, full), follows the finger
//! while dragged, and springs to a tier on release.
//!
//! # Primary responsibilities
//! - **Snap policy**: [`snap::SnapGeometry`] computes tier offsets for the
//!   viewport and [`snap::select_destination`] picks the release target.
//! - **Controller**: [`SheetController`] applies drag updates, chooses
//!   destinations, runs the spring, and handles programmatic open/close.
//! - **Presentation**: [`backdrop::Backdrop`] derives the dimming overlay;
//!   [`frame::SheetFrame`] snapshots are published for other threads.
//! - **Screen settings**: [`SheetContext`] holds the shared state and
//!   [`lease::ScreenLease`] scopes per-screen caps and backdrop toggles.
//! - **Browse**: [`browse::BrowseState`] is the drill-down inside the panel.
//! - **Config**: [`SheetConfig`] carries every tunable, loadable from
//!   TOML/JSON with the `config` feature.

pub mod backdrop;
pub mod browse;
pub mod config;
pub mod context;
pub mod controller;
pub mod frame;
pub mod lease;
pub mod snap;

pub use backdrop::{Backdrop, BackdropLayer, BackdropStyle};
pub use browse::{BackOutcome, BrowseState, BrowseView, CatalogNames};
pub use config::{SheetConfig, SheetConfigError};
pub use context::SheetContext;
pub use controller::SheetController;
pub use frame::SheetFrame;
pub use lease::{ScreenLease, ScreenOverrides};
pub use snap::{MaxSnapPoint, SnapGeometry, SnapPoint, SnapTarget, select_destination};
