//! Drive a [`SheetController`] from a [`GestureScript`] on a virtual clock.
//!
//! The clock advances in 16ms frames. Pointer steps carry their own
//! timestamps (milliseconds since script start); the sheet is ticked up to
//! each timestamp before the pointer event is delivered, so springs keep
//! moving between touches the way they would on a device.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use vfit_core::gesture::{DragRecognizer, PointerEvent};
use vfit_core::read_optimized::ReadOptimized;
use vfit_runtime::Observable;
use vfit_sheet::{
    BackOutcome, ScreenLease, ScreenOverrides, SheetConfig, SheetContext, SheetController,
    SheetFrame, SnapPoint,
};
use web_time::Instant;

use crate::error::Result;
use crate::script::{GestureScript, ScriptStep};

/// Frame interval of the virtual clock.
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames spent in one `settle` step.
pub const MAX_SETTLE_FRAMES: u32 = 10_000;

/// One line of the replay report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub op: &'static str,
    pub clock_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<SnapPoint>,
    pub frame: SheetFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub viewport_height: f64,
    pub steps: Vec<StepRecord>,
    pub final_frame: SheetFrame,
    pub resting_point: SnapPoint,
    pub title: String,
}

struct Session {
    ctx: SheetContext,
    sheet: SheetController,
    recognizer: DragRecognizer,
    inner_scroll: Observable<f64>,
    overrides: ScreenOverrides,
    _lease: Option<ScreenLease>,
    started: Instant,
    clock: Duration,
}

impl Session {
    fn new(script: &GestureScript, config: SheetConfig) -> Self {
        let ctx = SheetContext::new();
        let inner_scroll = Observable::new(script.inner_scroll);
        let recognizer = DragRecognizer::new(config.to_drag_config());
        let sheet = SheetController::new(ctx.clone(), script.viewport_height, config)
            .with_inner_scroll(inner_scroll.clone());
        Self {
            ctx,
            sheet,
            recognizer,
            inner_scroll,
            overrides: ScreenOverrides::new(),
            _lease: None,
            started: Instant::now(),
            clock: Duration::ZERO,
        }
    }

    fn advance_to(&mut self, at: Duration) {
        while self.clock + FRAME <= at {
            self.sheet.tick(FRAME);
            self.clock += FRAME;
        }
        if at > self.clock {
            self.sheet.tick(at - self.clock);
            self.clock = at;
        }
    }

    fn settle(&mut self) {
        let mut frames = 0;
        while self.sheet.tick(FRAME) {
            self.clock += FRAME;
            frames += 1;
            if frames >= MAX_SETTLE_FRAMES {
                warn!(frames, "sheet did not settle");
                return;
            }
        }
        debug!(frames, "sheet settled");
    }

    fn pointer(&mut self, event: PointerEvent, at_ms: u64) -> Option<SnapPoint> {
        let at = Duration::from_millis(at_ms);
        self.advance_to(at);
        let mut destination = None;
        for drag in self.recognizer.process(event, self.started + at) {
            if let Some(target) = self.sheet.handle(drag) {
                destination = Some(target.point);
            }
        }
        destination
    }

    fn relet(&mut self) {
        // Release before acquiring so the new lease records the defaults.
        self._lease = None;
        self._lease = Some(self.ctx.lease(self.overrides));
    }

    fn apply(&mut self, step: &ScriptStep) -> Option<SnapPoint> {
        match step {
            ScriptStep::Down { y, at_ms } => self.pointer(PointerEvent::Down { y: *y }, *at_ms),
            ScriptStep::Move { y, at_ms } => self.pointer(PointerEvent::Move { y: *y }, *at_ms),
            ScriptStep::Up { y, at_ms } => self.pointer(PointerEvent::Up { y: *y }, *at_ms),
            ScriptStep::Cancel { at_ms } => self.pointer(PointerEvent::Cancel, *at_ms),
            ScriptStep::Open { to } => {
                let _ = self.sheet.open(*to);
                Some(self.sheet.resting_point())
            }
            ScriptStep::Close => {
                let _ = self.sheet.close();
                Some(SnapPoint::Closed)
            }
            ScriptStep::SelectBrand { brand } => {
                let _ = self.sheet.select_brand(brand.as_str());
                Some(self.sheet.resting_point())
            }
            ScriptStep::SelectCategory { category } => {
                if !self.sheet.select_category(category.as_str()) {
                    debug!(%category, "category ignored outside a brand");
                }
                None
            }
            ScriptStep::Back => match self.sheet.back() {
                BackOutcome::CloseRequested => Some(SnapPoint::Closed),
                BackOutcome::SteppedUp => None,
            },
            ScriptStep::InnerScroll { offset } => {
                self.inner_scroll.set(*offset);
                None
            }
            ScriptStep::Cap { max } => {
                self.overrides = self.overrides.max_snap_point(*max);
                self.relet();
                None
            }
            ScriptStep::Backdrop { show } => {
                self.overrides = self.overrides.show_backdrop(*show);
                self.relet();
                None
            }
            ScriptStep::Resize { viewport_height } => {
                self.sheet.set_viewport_height(*viewport_height);
                None
            }
            ScriptStep::Wait { ms } => {
                let until = self.clock + Duration::from_millis(*ms);
                self.advance_to(until);
                None
            }
            ScriptStep::Settle => {
                self.settle();
                None
            }
        }
    }

    fn frame(&self) -> SheetFrame {
        self.sheet.frame_store().load()
    }
}

/// Replay `script`, settling after the last step.
pub fn run(script: &GestureScript, config: SheetConfig) -> Result<ReplayReport> {
    script.validate()?;
    let _span = info_span!(
        "vfit.replay",
        steps = script.steps.len(),
        viewport_height = script.viewport_height
    )
    .entered();

    let mut session = Session::new(script, config);
    let mut records = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let destination = session.apply(step);
        records.push(StepRecord {
            step: index + 1,
            op: step.name(),
            clock_ms: session.clock.as_millis() as u64,
            destination,
            frame: session.frame(),
        });
    }
    session.settle();

    let report = ReplayReport {
        viewport_height: session.sheet.viewport_height(),
        steps: records,
        final_frame: session.frame(),
        resting_point: session.sheet.resting_point(),
        title: session.sheet.title(&NoCatalog),
    };
    info!(
        resting = %report.resting_point,
        offset = report.final_frame.offset,
        "replay finished"
    );
    Ok(report)
}

/// Titles without a catalog fall back to the level names.
struct NoCatalog;

impl vfit_sheet::CatalogNames for NoCatalog {
    fn brand_name(&self, _brand: &str) -> Option<&str> {
        None
    }

    fn category_name(&self, _brand: &str, _category: &str) -> Option<&str> {
        None
    }
}
