//! Calibration error types

use thiserror::Error;

use crate::observer::{NormType, SearchType};

/// Errors surfaced by observers and the qparam calculation.
///
/// All errors are synchronous and final: every input is deterministic
/// in-memory data, so nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// Quantization parameters were requested before any data was observed.
    #[error("must run observer before calling calculate_qparams")]
    Uninitialized,

    /// A range with `min > max` was supplied or derived, which indicates
    /// corrupted statistics upstream.
    #[error("invalid range: min {min} should be less than or equal to max {max}")]
    InvalidRange {
        /// Lower bound of the offending range.
        min: f32,
        /// Upper bound of the offending range.
        max: f32,
    },

    /// A min/max search strategy other than `NonLinear` was requested.
    #[error("unsupported search type {0:?}: only non-linear min/max search is implemented")]
    UnsupportedSearchType(SearchType),

    /// A norm other than `L2` was requested for the range search.
    #[error("unsupported norm type {0:?}: only the L2 norm is implemented")]
    UnsupportedNorm(NormType),

    /// The stored histogram length no longer matches the configured bin
    /// count. This is a programming-invariant violation, not a user error.
    #[error("histogram has {actual} bins but the observer was configured with {expected}")]
    BinCountMismatch {
        /// Bin count the observer was configured with.
        expected: usize,
        /// Actual length of the stored histogram.
        actual: usize,
    },

    /// No observer is registered under the requested observation point name.
    #[error("no observer registered for observation point '{0}'")]
    UnknownObservationPoint(String),
}

/// Result type for calibration operations
pub type Result<T> = std::result::Result<T, CalibrationError>;
