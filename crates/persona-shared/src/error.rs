//! Error types for the persona engine.

use crate::error_category::{categorize, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Session source error: {0}")]
    Source(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Presentation category for this error, derived from its message text.
    pub fn category(&self) -> ErrorCategory {
        categorize(&self.to_string())
    }
}
