#![forbid(unsafe_code)]

//! The shared sheet state a session creates once.
//!
//! [`SheetContext`] is the single provider of the sheet's live offset, its
//! open flag, and the two screen-owned settings (`max_snap_point`,
//! `show_backdrop`). Screens and the controller hold clones; every clone
//! refers to the same values.

use vfit_runtime::{AnimatedValue, Observable};

use crate::lease::{ScreenLease, ScreenOverrides};
use crate::snap::MaxSnapPoint;

/// Handles to the session's shared sheet state. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SheetContext {
    offset: AnimatedValue,
    open: Observable<bool>,
    max_snap_point: Observable<MaxSnapPoint>,
    show_backdrop: Observable<bool>,
}

impl SheetContext {
    /// Closed sheet, no cap, backdrop enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: AnimatedValue::new(0.0),
            open: Observable::new(false),
            max_snap_point: Observable::new(MaxSnapPoint::Unrestricted),
            show_backdrop: Observable::new(true),
        }
    }

    /// Live sheet offset (0 closed, negative raised).
    #[must_use]
    pub fn offset(&self) -> &AnimatedValue {
        &self.offset
    }

    #[must_use]
    pub fn open(&self) -> &Observable<bool> {
        &self.open
    }

    #[must_use]
    pub fn max_snap_point(&self) -> &Observable<MaxSnapPoint> {
        &self.max_snap_point
    }

    #[must_use]
    pub fn show_backdrop(&self) -> &Observable<bool> {
        &self.show_backdrop
    }

    /// Apply a screen's overrides until the returned lease is dropped.
    pub fn lease(&self, overrides: ScreenOverrides) -> ScreenLease {
        ScreenLease::acquire(self, overrides)
    }
}

impl Default for SheetContext {
    fn default() -> Self {
        Self::new()
    }
}
