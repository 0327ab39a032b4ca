//! Online histogram observer

use ndarray::ArrayD;

use crate::error::{CalibrationError, Result};
use crate::observer::Observer;
use crate::qparams::{calculate_qparams, QParams, QuantDType, QuantScheme};

use super::search::non_linear_param_search;
use super::types::{NormType, SearchType};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 2048;

/// Observer that records a running histogram of observed values.
///
/// The first observation fixes a "relaxed" bin range: the tensor's own
/// range widened by 50% on each side to absorb batch-to-batch variance.
/// Later observations are binned over that same range and accumulated;
/// values outside it are not counted. The relaxed margin is a heuristic,
/// not a guarantee.
///
/// At calibration time the non-linear search picks the sub-range that
/// minimizes L2 quantization error, and that refined range is what gets
/// converted to quantization parameters.
#[derive(Clone, Debug)]
pub struct HistogramObserver {
    dtype: QuantDType,
    scheme: QuantScheme,
    /// Bin count the observer was configured with; `bins` returns here on reset.
    configured_bins: usize,
    bins: usize,
    histogram: Option<Vec<f64>>,
    min_val: Option<f32>,
    max_val: Option<f32>,
    relaxed_min: f32,
    relaxed_max: f32,
}

impl HistogramObserver {
    /// Create a new observer with [`DEFAULT_BINS`] histogram bins.
    pub fn new(dtype: QuantDType, scheme: QuantScheme) -> Self {
        Self {
            dtype,
            scheme,
            configured_bins: DEFAULT_BINS,
            bins: DEFAULT_BINS,
            histogram: None,
            min_val: None,
            max_val: None,
            relaxed_min: 0.0,
            relaxed_max: 0.0,
        }
    }

    /// Default activation observer: affine quantization onto unsigned 8-bit.
    pub fn default_activation() -> Self {
        Self::new(QuantDType::Unsigned8, QuantScheme::Affine)
    }

    /// Set the number of histogram bins. Only meaningful before the first
    /// observation.
    ///
    /// # Panics
    ///
    /// Panics if `bins` is zero.
    pub fn with_bins(mut self, bins: usize) -> Self {
        assert!(bins > 0, "histogram observer needs at least one bin");
        self.configured_bins = bins;
        self.bins = bins;
        self
    }

    /// Current bin count, including any zero-inclusion padding.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Bin counts accumulated so far, or `None` before the first observation.
    pub fn histogram(&self) -> Option<&[f64]> {
        self.histogram.as_deref()
    }

    /// Lower edge of the current bin range, or `None` before the first
    /// observation.
    pub fn min_val(&self) -> Option<f32> {
        self.min_val
    }

    /// Upper edge of the current bin range, or `None` before the first
    /// observation.
    pub fn max_val(&self) -> Option<f32> {
        self.max_val
    }

    /// Check if any data has been observed.
    pub fn has_data(&self) -> bool {
        self.histogram.is_some()
    }

    /// Fold a slice of values into the running histogram. Empty slices are
    /// skipped.
    pub fn observe_slice(&mut self, data: &[f32]) {
        if data.is_empty() {
            return;
        }

        if self.histogram.is_none() {
            let batch_min = data.iter().copied().fold(f32::INFINITY, f32::min);
            let batch_max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if !batch_min.is_finite() || !batch_max.is_finite() {
                return;
            }
            let range = batch_max - batch_min;
            // widen by 50% on each side; a constant tensor gets a unit
            // interval so the bin width stays positive
            let margin = if range > 0.0 { 0.5 * range } else { 0.5 };
            self.relaxed_min = batch_min - margin;
            self.relaxed_max = batch_max + margin;
            self.histogram = Some(histc(data, self.bins, self.relaxed_min, self.relaxed_max));
            self.min_val = Some(self.relaxed_min);
            self.max_val = Some(self.relaxed_max);
            return;
        }

        let batch = histc(data, self.bins, self.relaxed_min, self.relaxed_max);
        if let Some(histogram) = self.histogram.as_mut() {
            for (acc, count) in histogram.iter_mut().zip(&batch) {
                *acc += count;
            }
        }
    }

    /// Derive quantization parameters with explicit norm and search settings.
    ///
    /// Runs the zero-inclusion padding, the non-linear range search, and the
    /// qparam derivation over the refined range. All validation happens
    /// before any state is mutated.
    ///
    /// # Errors
    ///
    /// * `Uninitialized` if no data has been observed yet
    /// * `BinCountMismatch` if the histogram length diverged from `bins`
    /// * `UnsupportedSearchType` / `UnsupportedNorm` for unimplemented variants
    pub fn calculate_qparams_with(
        &mut self,
        norm_type: NormType,
        search_type: SearchType,
    ) -> Result<QParams> {
        let Some(histogram) = self.histogram.as_ref() else {
            return Err(CalibrationError::Uninitialized);
        };
        if histogram.len() != self.bins {
            return Err(CalibrationError::BinCountMismatch {
                expected: self.bins,
                actual: histogram.len(),
            });
        }
        if search_type != SearchType::NonLinear {
            return Err(CalibrationError::UnsupportedSearchType(search_type));
        }
        if norm_type != NormType::L2 {
            return Err(CalibrationError::UnsupportedNorm(norm_type));
        }

        self.include_zero();

        let (Some(min_val), Some(max_val), Some(histogram)) =
            (self.min_val, self.max_val, self.histogram.as_ref())
        else {
            return Err(CalibrationError::Uninitialized);
        };

        let (new_min, new_max) = non_linear_param_search(histogram, min_val, max_val, norm_type)?;
        calculate_qparams(new_min, new_max, self.dtype, self.scheme)
    }

    /// Pad the histogram so a bin boundary sits exactly at zero.
    ///
    /// Required so the range search is free to choose 0 as one of the range
    /// limits and 0.0f stays exactly representable. Grows `bins` and the
    /// stored histogram on whichever side excludes zero; a no-op once the
    /// range already spans zero.
    fn include_zero(&mut self) {
        let (Some(min_val), Some(max_val)) = (self.min_val, self.max_val) else {
            return;
        };
        let Some(histogram) = self.histogram.as_mut() else {
            return;
        };

        let bin_width = (max_val - min_val) / self.bins as f32;
        if min_val > 0.0 {
            let additional = (min_val / bin_width).ceil() as usize;
            self.bins += additional;
            let new_min = min_val - additional as f32 * bin_width;
            let mut padded = vec![0.0; additional];
            padded.extend_from_slice(histogram);
            *histogram = padded;
            self.min_val = Some(new_min);
            self.relaxed_min = new_min;
        } else if max_val < 0.0 {
            let additional = ((-max_val) / bin_width).ceil() as usize;
            self.bins += additional;
            let new_max = max_val + additional as f32 * bin_width;
            histogram.extend(std::iter::repeat(0.0).take(additional));
            self.max_val = Some(new_max);
            self.relaxed_max = new_max;
        }
    }
}

impl Observer for HistogramObserver {
    fn observe<'a>(&mut self, x: &'a ArrayD<f32>) -> &'a ArrayD<f32> {
        match x.as_slice() {
            Some(data) => self.observe_slice(data),
            None => {
                let data: Vec<f32> = x.iter().copied().collect();
                self.observe_slice(&data);
            }
        }
        x
    }

    fn calculate_qparams(&mut self) -> Result<QParams> {
        self.calculate_qparams_with(NormType::L2, SearchType::NonLinear)
    }

    fn reset(&mut self) {
        self.bins = self.configured_bins;
        self.histogram = None;
        self.min_val = None;
        self.max_val = None;
        self.relaxed_min = 0.0;
        self.relaxed_max = 0.0;
    }
}

/// Bin `data` into `bins` equal-width bins over `[min, max]`. Values outside
/// the range or non-finite are not counted; a value exactly at `max` lands in
/// the last bin.
fn histc(data: &[f32], bins: usize, min: f32, max: f32) -> Vec<f64> {
    let mut histogram = vec![0.0; bins];
    let bin_width = (f64::from(max) - f64::from(min)) / bins as f64;
    for &v in data {
        if !v.is_finite() || v < min || v > max {
            continue;
        }
        let idx = ((f64::from(v) - f64::from(min)) / bin_width) as usize;
        histogram[idx.min(bins - 1)] += 1.0;
    }
    histogram
}
