//! Range-search configuration types

use serde::{Deserialize, Serialize};

/// Norm minimized by the range search.
///
/// Only `L2` is implemented; requesting `L1` fails fast with
/// [`crate::error::CalibrationError::UnsupportedNorm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NormType {
    /// L2 (squared error) norm
    #[default]
    L2,
    /// L1 norm, recognized but not implemented
    L1,
}

/// Strategy for searching the clipping min/max over the histogram.
///
/// Only `NonLinear` is implemented; requesting `Linear` fails fast with
/// [`crate::error::CalibrationError::UnsupportedSearchType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SearchType {
    /// Greedy two-pointer quantile search minimizing quantization error
    #[default]
    NonLinear,
    /// Exhaustive linear sweep, recognized but not implemented
    Linear,
}
