#![forbid(unsafe_code)]

//! Backdrop dimming behind the open sheet.
//!
//! The backdrop style is a pure function of two flags: whether the sheet is
//! open and whether the active screen wants a backdrop. The opacity fades
//! toward its target on a fixed-duration curve instead of the sheet spring.
//! The layer switches immediately so an invisible backdrop never swallows
//! touches.

use std::time::Duration;

use tracing::trace;
use vfit_runtime::{AnimatedValue, Derived, Observable, Subscription};

#[cfg(feature = "config")]
use serde::Serialize;

/// Stacking position of the backdrop relative to the screen content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum BackdropLayer {
    /// Under the screen content; does not receive touches.
    Behind,
    /// Over the screen content; taps close the sheet.
    Front,
}

/// Target presentation of the backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropStyle {
    pub opacity: f64,
    pub layer: BackdropLayer,
}

/// Backdrop style for the given flags.
#[must_use]
pub fn backdrop_style(open: bool, show_backdrop: bool, open_opacity: f64) -> BackdropStyle {
    BackdropStyle {
        opacity: if open && show_backdrop {
            open_opacity
        } else {
            0.0
        },
        layer: if open {
            BackdropLayer::Front
        } else {
            BackdropLayer::Behind
        },
    }
}

/// Derived backdrop style plus its animated opacity.
pub struct Backdrop {
    style: Derived<BackdropStyle>,
    opacity: AnimatedValue,
    _fade: Subscription,
}

impl std::fmt::Debug for Backdrop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backdrop")
            .field("style", &self.style.get())
            .field("opacity", &self.opacity.get())
            .finish()
    }
}

impl Backdrop {
    /// Track `open` and `show_backdrop`, fading over `fade`.
    #[must_use]
    pub fn new(
        open: &Observable<bool>,
        show_backdrop: &Observable<bool>,
        open_opacity: f64,
        fade: Duration,
    ) -> Self {
        let style = Derived::combine(open, show_backdrop, move |open, show| {
            backdrop_style(*open, *show, open_opacity)
        });
        let opacity = AnimatedValue::new(style.get().opacity);
        let fade_sub = {
            let opacity = opacity.clone();
            style.subscribe(move |style| {
                let heading_to = opacity.target().unwrap_or_else(|| opacity.get());
                if heading_to != style.opacity {
                    trace!(target = style.opacity, layer = ?style.layer, "backdrop fade");
                    let _ = opacity.timing_to(style.opacity, fade);
                }
            })
        };
        Self {
            style,
            opacity,
            _fade: fade_sub,
        }
    }

    /// Current target style.
    #[must_use]
    pub fn style(&self) -> BackdropStyle {
        self.style.get()
    }

    /// Handle to the derived style, for subscriptions and frame assembly.
    #[must_use]
    pub fn style_observable(&self) -> Observable<BackdropStyle> {
        self.style.observable()
    }

    #[must_use]
    pub fn layer(&self) -> BackdropLayer {
        self.style.get().layer
    }

    /// Whether the backdrop currently receives touches.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.layer() == BackdropLayer::Front
    }

    /// Current (possibly mid-fade) opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }

    /// The animated opacity, for subscriptions.
    #[must_use]
    pub fn opacity_value(&self) -> &AnimatedValue {
        &self.opacity
    }

    /// Subscribe to style changes.
    pub fn subscribe_style(&self, callback: impl Fn(&BackdropStyle) + 'static) -> Subscription {
        self.style.subscribe(callback)
    }

    /// Advance the fade. Returns `true` while still fading.
    pub fn tick(&self, dt: Duration) -> bool {
        self.opacity.tick(dt)
    }
}
