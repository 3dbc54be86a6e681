//! Process-level error type.
//!
//! Exit codes:
//! - `2`: usage or local I/O (bad arguments, unwritable output directory)
//! - `3`: nothing could be retrieved for any requested date
//! - `4`: chart rendering failed
//!
//! Missing archive files and malformed lines are not errors; they are values
//! (`FetchOutcome`, `LineOutcome`) that the pipeline reports and skips.

use crate::series::AlignError;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AlignError> for AppError {
    fn from(err: AlignError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
