//! Post-training quantization calibration
//!
//! Estimates, per observation point, the numeric range of floating-point
//! tensors seen during model execution and derives quantization parameters
//! (scale, zero_point) mapping them onto an 8-bit integer domain:
//! - **MinMaxObserver**: running min/max range tracking
//! - **HistogramObserver**: online mergeable histogram with a non-linear
//!   search that clips outliers to minimize L2 quantization error
//! - **CalibrationContext**: caller-owned multiplexing of named observation
//!   points
//!
//! Observers are pass-through: `observe` returns its input unchanged, so
//! they can be inserted into a computation pipeline without altering its
//! result. All computation is single-threaded and CPU-bound; parallel
//! calibration shards run independent observers and merge their final
//! histograms with [`observer::combine_histograms`].

pub mod context;
pub mod error;
pub mod observer;
pub mod qparams;

pub use context::CalibrationContext;
pub use error::{CalibrationError, Result};
pub use observer::{
    combine_histograms, HistogramObserver, MinMaxObserver, NormType, Observer, SearchType,
    DEFAULT_BINS,
};
pub use qparams::{calculate_qparams, QParams, QuantDType, QuantScheme};
