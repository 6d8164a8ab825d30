use std::path::PathBuf;

use thiserror::Error;
use vfit_sheet::SheetConfigError;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("config error: {0}")]
    Config(#[from] SheetConfigError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("invalid script: step {step}: {message}")]
    InvalidScript { step: usize, message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidScript { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid_step(step: usize, message: impl Into<String>) -> Self {
        Self::InvalidScript {
            step,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HarnessError;

    #[test]
    fn invalid_step_formats_position() {
        let error = HarnessError::invalid_step(3, "time went backwards");
        assert_eq!(error.to_string(), "invalid script: step 3: time went backwards");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = HarnessError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
    }
}
