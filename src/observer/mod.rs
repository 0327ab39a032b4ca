//! Calibration observers
//!
//! Observers are instrumentation hooks inserted at observation points in a
//! computation pipeline. Each call to `observe` folds a tensor into the
//! observer's running statistics and returns the tensor unchanged, so
//! attaching an observer never alters the computation's result:
//! - **MinMaxObserver**: running min/max over all observed values
//! - **HistogramObserver**: running histogram with non-linear L2 range search
//!
//! Both strategies convert their final range to quantization parameters
//! through [`crate::qparams::calculate_qparams`].

mod histogram;
mod min_max;

#[cfg(test)]
mod tests;

pub use histogram::{combine_histograms, HistogramObserver, NormType, SearchType, DEFAULT_BINS};
pub use min_max::MinMaxObserver;

use ndarray::ArrayD;

use crate::error::Result;
use crate::qparams::QParams;

/// Contract shared by every observer strategy.
///
/// `observe` updates the statistics for one tensor and passes the tensor
/// through; `calculate_qparams` converts the collected statistics into
/// quantization parameters, recomputed fresh on every call.
pub trait Observer: std::fmt::Debug {
    /// Fold a tensor into the running statistics and return it unchanged.
    fn observe<'a>(&mut self, x: &'a ArrayD<f32>) -> &'a ArrayD<f32>;

    /// Derive quantization parameters from the statistics collected so far.
    ///
    /// # Errors
    ///
    /// `Uninitialized` if no data has been observed yet.
    fn calculate_qparams(&mut self) -> Result<QParams>;

    /// Clear all collected statistics.
    fn reset(&mut self);
}
