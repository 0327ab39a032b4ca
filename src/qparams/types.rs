//! Quantization target and parameter type definitions

use serde::{Deserialize, Serialize};

/// Target integer dtype for 8-bit quantization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuantDType {
    /// Signed 8-bit integers, representable range [-128, 127]
    Signed8,
    /// Unsigned 8-bit integers, representable range [0, 255]
    #[default]
    Unsigned8,
}

impl QuantDType {
    /// Smallest representable quantized value
    pub fn qmin(self) -> i32 {
        match self {
            QuantDType::Signed8 => -128,
            QuantDType::Unsigned8 => 0,
        }
    }

    /// Largest representable quantized value
    pub fn qmax(self) -> i32 {
        match self {
            QuantDType::Signed8 => 127,
            QuantDType::Unsigned8 => 255,
        }
    }
}

/// Per-tensor quantization scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuantScheme {
    /// Asymmetric: zero_point derived from the range so 0.0f maps exactly
    #[default]
    Affine,
    /// Symmetric: range reflected around zero, zero_point fixed (0 or 128)
    Symmetric,
}

/// Quantization parameters derived from an observed range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QParams {
    /// Quantization scheme the parameters were derived for
    pub scheme: QuantScheme,
    /// Target integer dtype
    pub dtype: QuantDType,
    /// Scale factor, always strictly positive
    pub scale: f64,
    /// Integer zero point, within `[qmin, qmax]` of the dtype
    pub zero_point: i32,
}

impl QParams {
    /// Check if these parameters use the symmetric scheme
    pub fn is_symmetric(&self) -> bool {
        self.scheme == QuantScheme::Symmetric
    }

    /// Number of representable quantization levels
    pub fn num_levels(&self) -> usize {
        (self.dtype.qmax() - self.dtype.qmin() + 1) as usize
    }
}
