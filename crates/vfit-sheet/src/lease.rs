#![forbid(unsafe_code)]

//! Screen-scoped sheet settings.
//!
//! A screen that needs a lower snap cap or no backdrop takes a
//! [`ScreenLease`] when it becomes active and drops it when it goes away.
//! Each overridden setting returns to the value it had when the lease was
//! taken.

use tracing::trace;
use vfit_runtime::ScopedOverride;

use crate::context::SheetContext;
use crate::snap::MaxSnapPoint;

/// Settings a screen wants while it is active. Unset fields are untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenOverrides {
    pub max_snap_point: Option<MaxSnapPoint>,
    pub show_backdrop: Option<bool>,
}

impl ScreenOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_snap_point(mut self, max: MaxSnapPoint) -> Self {
        self.max_snap_point = Some(max);
        self
    }

    #[must_use]
    pub fn show_backdrop(mut self, show: bool) -> Self {
        self.show_backdrop = Some(show);
        self
    }
}

/// Active overrides for one screen. Dropping restores the previous values.
#[must_use = "dropping the lease restores the previous settings immediately"]
#[derive(Debug)]
pub struct ScreenLease {
    max_snap_point: Option<ScopedOverride<MaxSnapPoint>>,
    show_backdrop: Option<ScopedOverride<bool>>,
}

impl ScreenLease {
    pub(crate) fn acquire(ctx: &SheetContext, overrides: ScreenOverrides) -> Self {
        trace!(?overrides, "screen lease acquired");
        Self {
            max_snap_point: overrides
                .max_snap_point
                .map(|max| ScopedOverride::acquire(ctx.max_snap_point(), max)),
            show_backdrop: overrides
                .show_backdrop
                .map(|show| ScopedOverride::acquire(ctx.show_backdrop(), show)),
        }
    }

    /// Whether this lease overrides anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_snap_point.is_none() && self.show_backdrop.is_none()
    }
}

impl Drop for ScreenLease {
    fn drop(&mut self) {
        if !self.is_empty() {
            trace!("screen lease released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapPoint;

    #[test]
    fn lease_restores_defaults() {
        let ctx = SheetContext::new();
        {
            let _lease = ctx.lease(
                ScreenOverrides::new()
                    .max_snap_point(MaxSnapPoint::Capped(SnapPoint::Mid))
                    .show_backdrop(false),
            );
            assert_eq!(
                ctx.max_snap_point().get(),
                MaxSnapPoint::Capped(SnapPoint::Mid)
            );
            assert!(!ctx.show_backdrop().get());
        }
        assert_eq!(ctx.max_snap_point().get(), MaxSnapPoint::Unrestricted);
        assert!(ctx.show_backdrop().get());
    }

    #[test]
    fn nested_lease_restores_outer_value() {
        let ctx = SheetContext::new();
        let outer = ctx.lease(ScreenOverrides::new().max_snap_point(MaxSnapPoint::Capped(
            SnapPoint::Mid,
        )));
        let inner = ctx.lease(ScreenOverrides::new().max_snap_point(MaxSnapPoint::Capped(
            SnapPoint::Closed,
        )));
        assert_eq!(
            ctx.max_snap_point().get(),
            MaxSnapPoint::Capped(SnapPoint::Closed)
        );
        drop(inner);
        assert_eq!(
            ctx.max_snap_point().get(),
            MaxSnapPoint::Capped(SnapPoint::Mid)
        );
        drop(outer);
        assert_eq!(ctx.max_snap_point().get(), MaxSnapPoint::Unrestricted);
    }

    #[test]
    fn partial_lease_leaves_other_setting_alone() {
        let ctx = SheetContext::new();
        let lease = ctx.lease(ScreenOverrides::new().show_backdrop(false));
        assert!(!lease.is_empty());
        assert_eq!(ctx.max_snap_point().version(), 0);
        drop(lease);
        assert!(ctx.show_backdrop().get());
        assert!(ctx.lease(ScreenOverrides::new()).is_empty());
    }
}
