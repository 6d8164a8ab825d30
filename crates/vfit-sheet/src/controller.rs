#![forbid(unsafe_code)]

//! The store sheet's snap controller.
//!
//! [`SheetController`] turns a vertical drag into one of a few resting
//! positions and drives the sheet there with a spring.
//!
//! # Drag
//!
//! The offset at drag start is the origin; every update moves the sheet to
//! `origin + translation`:
//!
//! - upward movement stops at the most open allowed tier;
//! - downward movement follows the finger while the content list inside
//!   the sheet is scrolled to its top, and is left to the list otherwise;
//! - the result is always clamped into `[active_max, 0]`.
//!
//! # Release
//!
//! See [`select_destination`]: fast releases pick by direction, slow ones
//! pick the nearest tier. The open flag is set as soon as the destination
//! is known, before the spring starts moving.
//!
//! # Close
//!
//! Whenever the sheet is sent to `Closed` (by [`SheetController::close`] or
//! by a release), the browse state resets only after the spring finishes,
//! so the content does not visibly swap while the sheet is still sliding
//! down. An interrupted close leaves the content alone.
//!
//! # Invariants
//!
//! 1. Drag updates never move the offset outside `[active_max, 0]`.
//! 2. Every release, `open`, and `close` targets exactly one candidate.
//! 3. `open` is true iff the latest target is not `Closed`.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, debug_span, trace};
use vfit_core::gesture::DragEvent;
use vfit_core::read_optimized::ArcSwapStore;
use vfit_runtime::{Completion, Observable, Subscription};

use crate::backdrop::Backdrop;
use crate::browse::{BackOutcome, BrowseState, CatalogNames};
use crate::config::SheetConfig;
use crate::context::SheetContext;
use crate::frame::{FramePublisher, SheetFrame};
use crate::snap::{MaxSnapPoint, SnapGeometry, SnapPoint, SnapTarget, select_destination};

/// State shared with the controller's own subscriptions.
struct Shared {
    ctx: SheetContext,
    config: SheetConfig,
    geometry: Cell<SnapGeometry>,
    viewport_height: Cell<f64>,
    resting: Cell<SnapPoint>,
    drag_origin: Cell<Option<f64>>,
    browse: Rc<RefCell<BrowseState>>,
}

impl Shared {
    fn max(&self) -> MaxSnapPoint {
        self.ctx.max_snap_point().get()
    }

    fn candidates(&self) -> Vec<SnapTarget> {
        self.geometry.get().candidates(self.max())
    }

    fn settle_to(&self, target: SnapTarget) -> Completion {
        let _span = debug_span!(
            "sheet.animate",
            point = %target.point,
            offset = target.offset
        )
        .entered();
        self.resting.set(target.point);
        self.ctx.open().set(!target.is_closed());
        let completion = self
            .ctx
            .offset()
            .spring_to(target.offset, self.config.spring);
        if target.is_closed() {
            let browse = Rc::clone(&self.browse);
            completion.on_finished(move || {
                trace!("browse state reset after close");
                browse.borrow_mut().reset();
            });
        }
        completion
    }

    /// Pull a resting sheet back under a lowered cap.
    fn enforce_cap(&self, max: MaxSnapPoint) {
        if self.drag_origin.get().is_some() {
            return;
        }
        let allowed = self.geometry.get().active_max(max);
        if self.resting.get() > allowed.point || self.ctx.offset().get() < allowed.offset {
            debug!(cap = ?max, to = %allowed.point, "snap cap lowered below sheet position");
            let _ = self.settle_to(allowed);
        }
    }
}

/// Drives the store sheet from drag events and programmatic open/close.
pub struct SheetController {
    shared: Rc<Shared>,
    inner_scroll: Option<Observable<f64>>,
    backdrop: Backdrop,
    frames: FramePublisher,
    _cap_watch: Subscription,
}

impl std::fmt::Debug for SheetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetController")
            .field("offset", &self.offset())
            .field("open", &self.is_open())
            .field("resting", &self.shared.resting.get())
            .field("dragging", &self.is_dragging())
            .field("browse", &*self.shared.browse.borrow())
            .finish()
    }
}

impl SheetController {
    /// Controller for `ctx` on a viewport `viewport_height` tall.
    #[must_use]
    pub fn new(ctx: SheetContext, viewport_height: f64, config: SheetConfig) -> Self {
        let geometry = SnapGeometry::new(
            viewport_height,
            config.snap.mid_fraction,
            config.snap.full_fraction,
        );
        let backdrop = Backdrop::new(
            ctx.open(),
            ctx.show_backdrop(),
            config.backdrop.opacity,
            config.backdrop.fade_duration(),
        );
        let frames = FramePublisher::attach(
            ctx.offset(),
            ctx.open(),
            backdrop.opacity_value(),
            &backdrop.style_observable(),
        );

        let shared = Rc::new(Shared {
            ctx,
            config,
            geometry: Cell::new(geometry),
            viewport_height: Cell::new(viewport_height),
            resting: Cell::new(SnapPoint::Closed),
            drag_origin: Cell::new(None),
            browse: Rc::new(RefCell::new(BrowseState::new())),
        });
        let cap_watch = {
            let shared = Rc::clone(&shared);
            let watched = shared.ctx.max_snap_point().clone();
            watched.subscribe(move |max| shared.enforce_cap(*max))
        };

        Self {
            shared,
            inner_scroll: None,
            backdrop,
            frames,
            _cap_watch: cap_watch,
        }
    }

    /// Track the scroll offset of the list inside the sheet (builder
    /// pattern). The list is at its top iff the offset is `<= 0`.
    #[must_use]
    pub fn with_inner_scroll(mut self, scroll: Observable<f64>) -> Self {
        self.inner_scroll = Some(scroll);
        self
    }

    pub fn set_inner_scroll(&mut self, scroll: Option<Observable<f64>>) {
        self.inner_scroll = scroll;
    }

    // -----------------------------------------------------------------------
    // Gesture input
    // -----------------------------------------------------------------------

    /// Catch the sheet: stop any running spring and remember the origin.
    pub fn on_drag_start(&self) {
        let offset = self.shared.ctx.offset();
        offset.stop();
        let origin = offset.get();
        self.shared.drag_origin.set(Some(origin));
        trace!(origin, "sheet.drag_start");
    }

    /// Move the sheet with the finger. `translation` is cumulative since
    /// drag start; negative is upward.
    pub fn on_drag_update(&self, translation: f64) {
        if translation.is_nan() {
            trace!("drag update without a translation ignored");
            return;
        }
        let offset = self.shared.ctx.offset();
        let origin = match self.shared.drag_origin.get() {
            Some(origin) => origin,
            None => {
                let origin = offset.get();
                self.shared.drag_origin.set(Some(origin));
                origin
            }
        };
        let max = self.shared.max();
        let geometry = self.shared.geometry.get();
        let active_max = geometry.active_max(max).offset;
        let candidate = origin + translation;

        let next = if translation < 0.0 {
            candidate.max(active_max)
        } else if translation > 0.0 {
            if !self.inner_scroll_at_top() {
                trace!(translation, "downward drag absorbed by inner scroll");
                return;
            }
            candidate.min(0.0)
        } else {
            candidate
        };

        offset.set_immediate(geometry.clamp(next, max));
    }

    /// Release the sheet with `velocity` (offset units per second) and
    /// spring it to the chosen tier.
    pub fn on_drag_end(&self, velocity: f64) -> SnapTarget {
        self.shared.drag_origin.set(None);
        let current = self.offset();
        let threshold = self.shared.config.fling.velocity_threshold;
        let _span = debug_span!("sheet.drag_end", current, velocity).entered();

        let candidates = self.shared.candidates();
        let destination = select_destination(&candidates, current, velocity, threshold);
        debug!(
            destination = %destination.point,
            offset = destination.offset,
            fling = velocity.abs() > threshold,
            "snap destination"
        );
        let _ = self.shared.settle_to(destination);
        destination
    }

    /// Feed one recognized drag event. Returns the destination on release.
    pub fn handle(&self, event: DragEvent) -> Option<SnapTarget> {
        match event {
            DragEvent::Start => {
                self.on_drag_start();
                None
            }
            DragEvent::Update { translation } => {
                self.on_drag_update(translation);
                None
            }
            DragEvent::End { velocity, .. } => Some(self.on_drag_end(velocity)),
        }
    }

    // -----------------------------------------------------------------------
    // Programmatic control
    // -----------------------------------------------------------------------

    /// Expand to `to` (default: the most open tier), limited by the cap.
    pub fn open(&self, to: Option<SnapPoint>) -> Completion {
        self.shared.drag_origin.set(None);
        let requested = to.unwrap_or(SnapPoint::Full);
        let target = self.shared.geometry.get().target(requested, self.shared.max());
        debug!(requested = %requested, target = %target.point, "sheet open");
        self.shared.settle_to(target)
    }

    /// Collapse the sheet. The browse state resets once the sheet has
    /// finished closing.
    pub fn close(&self) -> Completion {
        self.shared.drag_origin.set(None);
        debug!("sheet close");
        self.shared.settle_to(SnapTarget::CLOSED)
    }

    // -----------------------------------------------------------------------
    // Browse navigation
    // -----------------------------------------------------------------------

    /// Show `brand`'s categories and expand the sheet.
    pub fn select_brand(&self, brand: impl Into<String>) -> Completion {
        self.shared.browse.borrow_mut().select_brand(brand);
        self.open(None)
    }

    /// Show a category's clothes. Returns `false` if no brand is showing.
    pub fn select_category(&self, category: impl Into<String>) -> bool {
        self.shared.browse.borrow_mut().select_category(category)
    }

    /// Step the browse state up, closing the sheet from the top level.
    pub fn back(&self) -> BackOutcome {
        let outcome = self.shared.browse.borrow_mut().back();
        if outcome == BackOutcome::CloseRequested {
            let _ = self.close();
        }
        outcome
    }

    #[must_use]
    pub fn browse(&self) -> Ref<'_, BrowseState> {
        self.shared.browse.borrow()
    }

    /// Header title for the current browse level.
    #[must_use]
    pub fn title(&self, names: &dyn CatalogNames) -> String {
        self.shared.browse.borrow().title(names).to_owned()
    }

    // -----------------------------------------------------------------------
    // Frame loop and queries
    // -----------------------------------------------------------------------

    /// Advance the sheet spring and backdrop fade. Returns `true` while
    /// anything is still moving.
    pub fn tick(&self, dt: Duration) -> bool {
        let sheet = self.shared.ctx.offset().tick(dt);
        let backdrop = self.backdrop.tick(dt);
        sheet || backdrop
    }

    /// Recompute snap offsets for a new viewport height. A resting sheet
    /// jumps to its tier's new offset.
    pub fn set_viewport_height(&self, viewport_height: f64) {
        let config = &self.shared.config;
        let geometry = SnapGeometry::new(
            viewport_height,
            config.snap.mid_fraction,
            config.snap.full_fraction,
        );
        self.shared.geometry.set(geometry);
        self.shared.viewport_height.set(viewport_height);
        debug!(viewport_height, "sheet viewport resized");

        if self.is_dragging() {
            return;
        }
        let target = geometry.target(self.shared.resting.get(), self.shared.max());
        let offset = self.shared.ctx.offset();
        if offset.is_animating() {
            let _ = self.shared.settle_to(target);
        } else {
            self.shared.resting.set(target.point);
            self.shared.ctx.open().set(!target.is_closed());
            offset.set_immediate(target.offset);
        }
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.shared.ctx.offset().get()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.ctx.open().get()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.shared.drag_origin.get().is_some()
    }

    /// Whether the sheet spring is at rest.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.shared.ctx.offset().is_animating()
    }

    /// Tier of the latest target.
    #[must_use]
    pub fn resting_point(&self) -> SnapPoint {
        self.shared.resting.get()
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.shared.viewport_height.get()
    }

    #[must_use]
    pub fn geometry(&self) -> SnapGeometry {
        self.shared.geometry.get()
    }

    /// Allowed targets under the current cap, least open first.
    #[must_use]
    pub fn candidates(&self) -> Vec<SnapTarget> {
        self.shared.candidates()
    }

    #[must_use]
    pub fn active_max(&self) -> SnapTarget {
        self.shared.geometry.get().active_max(self.shared.max())
    }

    #[must_use]
    pub fn context(&self) -> &SheetContext {
        &self.shared.ctx
    }

    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.shared.config
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Store holding the latest [`SheetFrame`], readable from any thread.
    #[must_use]
    pub fn frame_store(&self) -> Arc<ArcSwapStore<SheetFrame>> {
        self.frames.store()
    }

    fn inner_scroll_at_top(&self) -> bool {
        self.inner_scroll.as_ref().is_none_or(|scroll| scroll.get() <= 0.0)
    }
}
