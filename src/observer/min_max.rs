//! Running min/max observer

use ndarray::ArrayD;

use crate::error::{CalibrationError, Result};
use crate::qparams::{calculate_qparams, QParams, QuantDType, QuantScheme};

use super::Observer;

/// Observer that records the running min and max of every observed tensor.
///
/// Keeps no history of the distribution shape, so the derived range widens
/// monotonically and is independent of observation order.
#[derive(Clone, Debug)]
pub struct MinMaxObserver {
    dtype: QuantDType,
    scheme: QuantScheme,
    min_val: Option<f32>,
    max_val: Option<f32>,
}

impl MinMaxObserver {
    /// Create a new observer for the given quantization target.
    pub fn new(dtype: QuantDType, scheme: QuantScheme) -> Self {
        Self { dtype, scheme, min_val: None, max_val: None }
    }

    /// Default activation observer: affine quantization onto unsigned 8-bit.
    pub fn default_activation() -> Self {
        Self::new(QuantDType::Unsigned8, QuantScheme::Affine)
    }

    /// Default weight observer: symmetric quantization onto signed 8-bit.
    pub fn default_weight() -> Self {
        Self::new(QuantDType::Signed8, QuantScheme::Symmetric)
    }

    /// Fold a slice of values into the running min/max. Empty slices are
    /// skipped.
    pub fn observe_slice(&mut self, data: &[f32]) {
        if data.is_empty() {
            return;
        }

        let batch_min = data.iter().copied().fold(f32::INFINITY, f32::min);
        let batch_max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if !batch_min.is_finite() || !batch_max.is_finite() {
            return;
        }

        self.min_val = Some(self.min_val.map_or(batch_min, |m| m.min(batch_min)));
        self.max_val = Some(self.max_val.map_or(batch_max, |m| m.max(batch_max)));
    }

    /// Running minimum, or `None` before the first observation.
    pub fn min_val(&self) -> Option<f32> {
        self.min_val
    }

    /// Running maximum, or `None` before the first observation.
    pub fn max_val(&self) -> Option<f32> {
        self.max_val
    }

    /// Check if any data has been observed.
    pub fn has_data(&self) -> bool {
        self.min_val.is_some()
    }
}

impl Observer for MinMaxObserver {
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
        match (self.min_val, self.max_val) {
            (Some(min_val), Some(max_val)) => {
                calculate_qparams(min_val, max_val, self.dtype, self.scheme)
            }
            _ => Err(CalibrationError::Uninitialized),
        }
    }

    fn reset(&mut self) {
        self.min_val = None;
        self.max_val = None;
    }
}
