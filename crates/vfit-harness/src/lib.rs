#![forbid(unsafe_code)]

//! Gesture replay harness for the VirtualFit store sheet.
//!
//! Scripts describe pointer input and programmatic calls on a virtual
//! clock; the harness feeds them through the drag recognizer and the sheet
//! controller and reports the published frame after every step.

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;
pub mod script;

pub use cli::{run, run_from_env};
pub use error::{HarnessError, Result};
pub use replay::{ReplayReport, StepRecord};
pub use script::{GestureScript, ScriptStep};
