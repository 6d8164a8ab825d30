#![forbid(unsafe_code)]

//! Snapshots of the sheet for readers off the UI thread.

use std::rc::Rc;
use std::sync::Arc;

#[cfg(feature = "config")]
use serde::Serialize;
use vfit_core::read_optimized::{ArcSwapStore, ReadOptimized};
use vfit_runtime::{AnimatedValue, Observable, Subscription};

use crate::backdrop::{BackdropLayer, BackdropStyle};

/// Everything a renderer needs to draw the sheet for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct SheetFrame {
    pub offset: f64,
    pub open: bool,
    pub backdrop_opacity: f64,
    pub backdrop_layer: BackdropLayer,
}

impl Default for SheetFrame {
    fn default() -> Self {
        Self {
            offset: 0.0,
            open: false,
            backdrop_opacity: 0.0,
            backdrop_layer: BackdropLayer::Behind,
        }
    }
}

/// Sources a frame is assembled from.
struct FrameSources {
    offset: AnimatedValue,
    open: Observable<bool>,
    opacity: AnimatedValue,
    style: Observable<BackdropStyle>,
    store: Arc<ArcSwapStore<SheetFrame>>,
}

impl FrameSources {
    fn snapshot(&self) -> SheetFrame {
        SheetFrame {
            offset: self.offset.get(),
            open: self.open.get(),
            backdrop_opacity: self.opacity.get(),
            backdrop_layer: self.style.with(|s| s.layer),
        }
    }

    fn publish(&self) {
        self.store.store(self.snapshot());
    }
}

/// Keeps a frame store in sync with the sheet's observables.
pub(crate) struct FramePublisher {
    store: Arc<ArcSwapStore<SheetFrame>>,
    _subscriptions: Vec<Subscription>,
}

impl FramePublisher {
    pub(crate) fn attach(
        offset: &AnimatedValue,
        open: &Observable<bool>,
        opacity: &AnimatedValue,
        style: &Observable<BackdropStyle>,
    ) -> Self {
        let store = Arc::new(ArcSwapStore::new(SheetFrame::default()));
        let sources = Rc::new(FrameSources {
            offset: offset.clone(),
            open: open.clone(),
            opacity: opacity.clone(),
            style: style.clone(),
            store: Arc::clone(&store),
        });
        sources.publish();

        let on_change = |sources: &Rc<FrameSources>| {
            let sources = Rc::clone(sources);
            move || sources.publish()
        };
        let subscriptions = vec![
            {
                let publish = on_change(&sources);
                offset.subscribe(move |_| publish())
            },
            {
                let publish = on_change(&sources);
                open.subscribe(move |_| publish())
            },
            {
                let publish = on_change(&sources);
                opacity.subscribe(move |_| publish())
            },
            {
                let publish = on_change(&sources);
                style.subscribe(move |_| publish())
            },
        ];

        Self {
            store,
            _subscriptions: subscriptions,
        }
    }

    pub(crate) fn store(&self) -> Arc<ArcSwapStore<SheetFrame>> {
        Arc::clone(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::backdrop_style;

    #[test]
    fn publishes_on_each_source_change() {
        let offset = AnimatedValue::new(0.0);
        let open = Observable::new(false);
        let opacity = AnimatedValue::new(0.0);
        let style = Observable::new(backdrop_style(false, true, 0.7));
        let publisher = FramePublisher::attach(&offset, &open, &opacity, &style);
        let store = publisher.store();
        assert_eq!(store.load(), SheetFrame::default());

        offset.set_immediate(-120.0);
        assert_eq!(store.load().offset, -120.0);

        open.set(true);
        style.set(backdrop_style(true, true, 0.7));
        opacity.set_immediate(0.35);
        let frame = store.load();
        assert!(frame.open);
        assert_eq!(frame.backdrop_layer, BackdropLayer::Front);
        assert_eq!(frame.backdrop_opacity, 0.35);
    }

    #[test]
    fn dropping_publisher_stops_updates() {
        let offset = AnimatedValue::new(0.0);
        let open = Observable::new(false);
        let opacity = AnimatedValue::new(0.0);
        let style = Observable::new(backdrop_style(false, true, 0.7));
        let store = FramePublisher::attach(&offset, &open, &opacity, &style).store();
        offset.set_immediate(-50.0);
        assert_eq!(store.load().offset, 0.0);
    }

    #[cfg(feature = "config")]
    #[test]
    fn frame_serializes_to_json() {
        let frame = SheetFrame {
            offset: -240.0,
            open: true,
            backdrop_opacity: 0.7,
            backdrop_layer: BackdropLayer::Front,
        };
        let json = serde_json::to_value(frame).expect("serialize");
        assert_eq!(json["offset"], -240.0);
        assert_eq!(json["backdrop_layer"], "front");
    }
}
