//! End-to-end sheet scenarios on an 800px viewport with default config.
//!
//! Run:
//!   cargo test -p vfit-sheet --test snap_scenarios

use std::time::Duration;

use vfit_core::gesture::{DragRecognizer, PointerEvent};
use vfit_runtime::{AnimationOutcome, Observable};
use vfit_sheet::{
    BrowseView, MaxSnapPoint, ScreenOverrides, SheetConfig, SheetContext, SheetController,
    SnapPoint,
};
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);
const H: f64 = 800.0;

fn settle(sheet: &SheetController) -> usize {
    let mut frames = 0;
    while sheet.tick(FRAME) {
        frames += 1;
        assert!(frames < 2_000, "sheet never settled");
    }
    frames
}

#[test]
fn fling_up_from_partial_drag_reaches_full() {
    let sheet = SheetController::new(SheetContext::new(), H, SheetConfig::default());
    sheet.on_drag_start();
    sheet.on_drag_update(-300.0);
    let target = sheet.on_drag_end(-600.0);

    assert_eq!(target.point, SnapPoint::Full);
    assert_eq!(target.offset, -560.0);
    assert!(sheet.is_open());
    settle(&sheet);
    assert_eq!(sheet.offset(), -560.0);
}

#[test]
fn slow_release_under_mid_cap_snaps_to_mid() {
    let ctx = SheetContext::new();
    let sheet = SheetController::new(ctx.clone(), H, SheetConfig::default());
    let _lease =
        ctx.lease(ScreenOverrides::new().max_snap_point(MaxSnapPoint::Capped(SnapPoint::Mid)));
    assert_eq!(sheet.active_max().offset, -240.0);

    sheet.on_drag_start();
    sheet.on_drag_update(-200.0);
    let target = sheet.on_drag_end(0.0);

    assert_eq!(target.offset, -240.0);
    settle(&sheet);
    assert_eq!(sheet.offset(), -240.0);
}

#[test]
fn downward_fling_from_full_with_list_at_top() {
    let scroll = Observable::new(0.0);
    let sheet = SheetController::new(SheetContext::new(), H, SheetConfig::default())
        .with_inner_scroll(scroll);
    let _ = sheet.select_brand("b1");
    assert!(sheet.select_category("c1"));
    settle(&sheet);
    assert_eq!(sheet.offset(), -560.0);

    // Fling down from FULL: the next tier below the release point.
    sheet.on_drag_start();
    sheet.on_drag_update(150.0);
    assert_eq!(sheet.offset(), -410.0);
    let target = sheet.on_drag_end(700.0);
    assert_eq!(target.point, SnapPoint::Mid);
    settle(&sheet);
    assert!(sheet.is_open());
    assert!(matches!(sheet.browse().view(), BrowseView::Clothes { .. }));

    // A second fling past MID closes the sheet and resets browsing once
    // the close has finished.
    sheet.on_drag_start();
    sheet.on_drag_update(40.0);
    let target = sheet.on_drag_end(700.0);
    assert_eq!(target.point, SnapPoint::Closed);
    assert!(!sheet.is_open());
    assert!(matches!(sheet.browse().view(), BrowseView::Clothes { .. }));

    settle(&sheet);
    assert_eq!(sheet.offset(), 0.0);
    assert_eq!(sheet.browse().view(), &BrowseView::Brands);
}

#[test]
fn explicit_close_resolves_and_resets() {
    let sheet = SheetController::new(SheetContext::new(), H, SheetConfig::default());
    let _ = sheet.select_brand("b1");
    settle(&sheet);

    let completion = sheet.close();
    assert!(!completion.is_resolved());
    settle(&sheet);
    assert_eq!(completion.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(sheet.browse().view(), &BrowseView::Brands);
}

#[test]
fn pointer_stream_drives_controller() {
    let sheet = SheetController::new(SheetContext::new(), H, SheetConfig::default());
    let mut recognizer = DragRecognizer::new(sheet.config().to_drag_config());
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    let mut events = recognizer.process(PointerEvent::Down { y: 700.0 }, at(0));
    for step in 1..=10u64 {
        let y = 700.0 - 30.0 * step as f64;
        events.extend(recognizer.process(PointerEvent::Move { y }, at(step * 10)));
    }
    events.extend(recognizer.process(PointerEvent::Up { y: 400.0 }, at(110)));

    let mut destination = None;
    for event in events {
        if let Some(target) = sheet.handle(event) {
            destination = Some(target);
        }
    }

    // 300px in 100ms is a fast upward fling.
    assert_eq!(destination.map(|t| t.point), Some(SnapPoint::Full));
    settle(&sheet);
    assert_eq!(sheet.offset(), -560.0);
}

#[test]
fn backdrop_follows_screen_toggle() {
    let ctx = SheetContext::new();
    let sheet = SheetController::new(ctx.clone(), H, SheetConfig::default());
    let lease = ctx.lease(ScreenOverrides::new().show_backdrop(false));
    let _ = sheet.open(None);
    settle(&sheet);
    assert_eq!(sheet.backdrop().opacity(), 0.0);
    assert!(sheet.backdrop().is_interactive());

    drop(lease);
    settle(&sheet);
    assert_eq!(sheet.backdrop().opacity(), 0.7);
}

#[test]
fn spring_settles_in_about_two_and_a_half_seconds() {
    let sheet = SheetController::new(SheetContext::new(), H, SheetConfig::default());
    let _ = sheet.open(None);
    let frames = settle(&sheet);
    let elapsed = FRAME * frames as u32;
    assert!(
        elapsed > Duration::from_millis(1_500) && elapsed < Duration::from_millis(4_000),
        "settled after {elapsed:?}"
    );
}
