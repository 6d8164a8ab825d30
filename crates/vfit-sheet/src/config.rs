#![forbid(unsafe_code)]

//! Tunable parameters for the store sheet.
//!
//! [`SheetConfig`] groups every constant the controller reads (snap
//! fractions, fling threshold, spring, backdrop fade, drag slop) and can be
//! loaded from TOML or JSON when the `config` feature is enabled.
//!
//! # Loading
//!
//! ```toml
//! # vfit-sheet.toml
//! [snap]
//! mid_fraction = 0.5
//!
//! [fling]
//! velocity_threshold = 650.0
//! ```
//!
//! ```rust,ignore
//! let config = SheetConfig::from_file("vfit-sheet.toml")?.validated()?;
//! ```
//!
//! Omitted fields keep their defaults, and `SheetConfig::default()` is the
//! store panel's shipped behavior.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use vfit_core::animation::SpringSpec;
use vfit_core::gesture::{DEFAULT_MAX_FLING_VELOCITY, DEFAULT_TOUCH_SLOP, DragConfig};

// ---------------------------------------------------------------------------
// Top-level SheetConfig
// ---------------------------------------------------------------------------

/// Every tunable parameter of the store sheet.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetConfig {
    /// Snap tier positions as fractions of the viewport height.
    pub snap: SnapPolicyConfig,

    /// Release velocity that counts as a fling.
    pub fling: FlingPolicyConfig,

    /// Spring used for every sheet movement.
    pub spring: SpringSpec,

    /// Backdrop dimming.
    pub backdrop: BackdropPolicyConfig,

    /// Drag recognition.
    pub drag: DragPolicyConfig,
}

impl SheetConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SheetConfigError> {
        toml::from_str(s).map_err(SheetConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, SheetConfigError> {
        serde_json::from_str(s).map_err(SheetConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format by extension (`.json` or TOML).
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Return `self` if valid, otherwise every validation error.
    pub fn validated(self) -> Result<Self, SheetConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SheetConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("snap.mid_fraction", self.snap.mid_fraction),
            ("snap.full_fraction", self.snap.full_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if self.snap.mid_fraction >= self.snap.full_fraction {
            errors.push(format!(
                "snap.mid_fraction ({}) must be below snap.full_fraction ({})",
                self.snap.mid_fraction, self.snap.full_fraction
            ));
        }

        if !self.fling.velocity_threshold.is_finite() || self.fling.velocity_threshold < 0.0 {
            errors.push(format!(
                "fling.velocity_threshold must be finite and >= 0, got {}",
                self.fling.velocity_threshold
            ));
        }

        if !(self.spring.stiffness > 0.0) {
            errors.push(format!(
                "spring.stiffness must be > 0, got {}",
                self.spring.stiffness
            ));
        }
        if !(self.spring.damping >= 0.0) {
            errors.push(format!(
                "spring.damping must be >= 0, got {}",
                self.spring.damping
            ));
        }
        if !(self.spring.mass > 0.0) {
            errors.push(format!("spring.mass must be > 0, got {}", self.spring.mass));
        }

        if !(0.0..=1.0).contains(&self.backdrop.opacity) {
            errors.push(format!(
                "backdrop.opacity must be in [0, 1], got {}",
                self.backdrop.opacity
            ));
        }

        if !(self.drag.touch_slop >= 0.0) {
            errors.push(format!(
                "drag.touch_slop must be >= 0, got {}",
                self.drag.touch_slop
            ));
        }
        if !(self.drag.max_fling_velocity > 0.0) {
            errors.push(format!(
                "drag.max_fling_velocity must be > 0, got {}",
                self.drag.max_fling_velocity
            ));
        }
        if self.drag.max_fling_velocity <= self.fling.velocity_threshold {
            errors.push(format!(
                "drag.max_fling_velocity ({}) must exceed fling.velocity_threshold ({})",
                self.drag.max_fling_velocity, self.fling.velocity_threshold
            ));
        }

        errors
    }

    /// Drag recognizer settings.
    #[must_use]
    pub fn to_drag_config(&self) -> DragConfig {
        DragConfig {
            touch_slop: self.drag.touch_slop,
            max_fling_velocity: self.drag.max_fling_velocity,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Snap tier fractions of the viewport height.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SnapPolicyConfig {
    /// `Mid` offset as a fraction of viewport height. Default: 0.3.
    pub mid_fraction: f64,
    /// `Full` offset as a fraction of viewport height. Default: 0.7.
    pub full_fraction: f64,
}

impl Default for SnapPolicyConfig {
    fn default() -> Self {
        Self {
            mid_fraction: 0.3,
            full_fraction: 0.7,
        }
    }
}

/// Fling detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FlingPolicyConfig {
    /// Release speed (offset units per second) above which direction wins
    /// over distance. Default: 500.
    pub velocity_threshold: f64,
}

impl Default for FlingPolicyConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 500.0,
        }
    }
}

/// Backdrop dimming.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BackdropPolicyConfig {
    /// Opacity while the sheet is open. Default: 0.7.
    pub opacity: f64,
    /// Fade duration in milliseconds. Default: 300.
    pub fade_ms: u64,
}

impl BackdropPolicyConfig {
    #[must_use]
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Default for BackdropPolicyConfig {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            fade_ms: 300,
        }
    }
}

/// Drag recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DragPolicyConfig {
    /// Travel before a press becomes a drag. Default: 8.
    pub touch_slop: f64,
    /// Cap on estimated release speed. Default: 8000.
    pub max_fling_velocity: f64,
}

impl Default for DragPolicyConfig {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a sheet configuration.
#[derive(Debug)]
pub enum SheetConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SheetConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SheetConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
