// =============================================================================
// Core error types
// =============================================================================
//
// Only two failure kinds leave the indicator pipeline: the normalizer found no
// usable rows, or the cleaned series is too short for the longest requested
// window. Per-row parse failures are recovered inside the normalizer and never
// escape; they use `RowError` instead.
// =============================================================================

use thiserror::Error;

/// Errors surfaced by the indicator pipeline to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Every input row was malformed (or the input was empty).
    #[error("insufficient data: no valid rows among {rows} input rows")]
    InsufficientData { rows: usize },

    /// The cleaned series is shorter than the longest configured window.
    #[error("insufficient history: required {required} bars, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// The indicator configuration requests something that cannot be computed.
    #[error("invalid indicator config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Stable machine-readable name used by the HTTP layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Why a single raw row was dropped by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected at least {expected} columns, got {actual}")]
    MissingColumns { expected: usize, actual: usize },

    #[error("unparseable date {0:?}")]
    BadDate(String),

    #[error("unparseable {field} value {value:?}")]
    BadNumber { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
