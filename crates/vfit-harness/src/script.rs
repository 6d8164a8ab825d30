//! Gesture scripts: a JSON description of one session with the sheet.
//!
//! ```json
//! {
//!   "viewport_height": 800,
//!   "steps": [
//!     { "op": "down", "y": 700, "at_ms": 0 },
//!     { "op": "move", "y": 550, "at_ms": 50 },
//!     { "op": "up", "y": 400, "at_ms": 100 },
//!     { "op": "settle" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vfit_sheet::{MaxSnapPoint, SnapPoint};

use crate::error::{HarnessError, Result};

fn default_viewport_height() -> f64 {
    800.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Scroll offset of the list inside the sheet at session start.
    #[serde(default)]
    pub inner_scroll: f64,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Down { y: f64, at_ms: u64 },
    Move { y: f64, at_ms: u64 },
    Up { y: f64, at_ms: u64 },
    Cancel { at_ms: u64 },
    Open {
        #[serde(default)]
        to: Option<SnapPoint>,
    },
    Close,
    SelectBrand { brand: String },
    SelectCategory { category: String },
    Back,
    InnerScroll { offset: f64 },
    Cap { max: MaxSnapPoint },
    Backdrop { show: bool },
    Resize { viewport_height: f64 },
    Wait { ms: u64 },
    Settle,
}

impl ScriptStep {
    /// Timestamp of a pointer step.
    #[must_use]
    pub fn at_ms(&self) -> Option<u64> {
        match self {
            Self::Down { at_ms, .. }
            | Self::Move { at_ms, .. }
            | Self::Up { at_ms, .. }
            | Self::Cancel { at_ms } => Some(*at_ms),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Down { .. } => "down",
            Self::Move { .. } => "move",
            Self::Up { .. } => "up",
            Self::Cancel { .. } => "cancel",
            Self::Open { .. } => "open",
            Self::Close => "close",
            Self::SelectBrand { .. } => "select_brand",
            Self::SelectCategory { .. } => "select_category",
            Self::Back => "back",
            Self::InnerScroll { .. } => "inner_scroll",
            Self::Cap { .. } => "cap",
            Self::Backdrop { .. } => "backdrop",
            Self::Resize { .. } => "resize",
            Self::Wait { .. } => "wait",
            Self::Settle => "settle",
        }
    }
}

impl GestureScript {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check pointer timestamps never go backwards and sizes are finite.
    pub fn validate(&self) -> Result<()> {
        if !self.viewport_height.is_finite() {
            return Err(HarnessError::invalid_step(0, "viewport_height must be finite"));
        }
        let mut last_at = None;
        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            match step {
                ScriptStep::Down { y, .. } | ScriptStep::Move { y, .. } | ScriptStep::Up { y, .. }
                    if !y.is_finite() =>
                {
                    return Err(HarnessError::invalid_step(position, "pointer y must be finite"));
                }
                ScriptStep::Resize { viewport_height } if !viewport_height.is_finite() => {
                    return Err(HarnessError::invalid_step(
                        position,
                        "viewport_height must be finite",
                    ));
                }
                _ => {}
            }
            if let Some(at) = step.at_ms() {
                match last_at {
                    Some(prev) if at < prev => {
                        return Err(HarnessError::invalid_step(
                            position,
                            format!("at_ms {at} is earlier than previous pointer step ({prev})"),
                        ));
                    }
                    _ => {}
                }
                last_at = Some(at);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps_with_defaults() {
        let script = GestureScript::from_json_str(
            r#"{
                "steps": [
                    { "op": "down", "y": 700, "at_ms": 0 },
                    { "op": "open" },
                    { "op": "open", "to": "mid" },
                    { "op": "cap", "max": { "capped": "mid" } },
                    { "op": "cap", "max": "unrestricted" },
                    { "op": "settle" }
                ]
            }"#,
        )
        .expect("valid script");
        assert_eq!(script.viewport_height, 800.0);
        assert_eq!(script.steps[1], ScriptStep::Open { to: None });
        assert_eq!(
            script.steps[2],
            ScriptStep::Open {
                to: Some(SnapPoint::Mid)
            }
        );
        assert_eq!(
            script.steps[3],
            ScriptStep::Cap {
                max: MaxSnapPoint::Capped(SnapPoint::Mid)
            }
        );
        assert_eq!(script.steps[5].name(), "settle");
    }

    #[test]
    fn rejects_time_going_backwards() {
        let err = GestureScript::from_json_str(
            r#"{ "steps": [
                { "op": "down", "y": 700, "at_ms": 50 },
                { "op": "settle" },
                { "op": "move", "y": 600, "at_ms": 40 }
            ] }"#,
        )
        .expect_err("out of order");
        assert!(matches!(err, HarnessError::InvalidScript { step: 3, .. }));
    }

    #[test]
    fn unknown_op_is_json_error() {
        let err = GestureScript::from_json_str(r#"{ "steps": [ { "op": "teleport" } ] }"#)
            .expect_err("unknown op");
        assert!(matches!(err, HarnessError::Json(_)));
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = GestureScript::from_file(&path).expect_err("missing");
        assert!(matches!(err, HarnessError::MissingPath { .. }));
    }
}
