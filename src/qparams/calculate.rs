//! Scale and zero-point derivation from an observed range

use crate::error::{CalibrationError, Result};

use super::types::{QParams, QuantDType, QuantScheme};

/// Derive quantization parameters from an observed `[min_val, max_val]` range.
///
/// The range is first extended to include zero so that 0.0f is exactly
/// representable in the quantized domain. A degenerate range
/// (`min_val == max_val` after clamping, e.g. a constant-zero tensor)
/// yields `scale = 1.0, zero_point = 0` to avoid division by zero.
///
/// The scale is floored at `f32::EPSILON` so it is always invertible.
///
/// # Errors
///
/// * `Uninitialized` if either bound is not finite (no observation occurred)
/// * `InvalidRange` if `min_val > max_val`
pub fn calculate_qparams(
    min_val: f32,
    max_val: f32,
    dtype: QuantDType,
    scheme: QuantScheme,
) -> Result<QParams> {
    if !min_val.is_finite() || !max_val.is_finite() {
        return Err(CalibrationError::Uninitialized);
    }
    if min_val > max_val {
        return Err(CalibrationError::InvalidRange { min: min_val, max: max_val });
    }

    let (qmin, qmax) = (dtype.qmin(), dtype.qmax());

    // Extend the range to include 0 so that 0.0f is exactly representable.
    let min_val = min_val.min(0.0);
    let max_val = max_val.max(0.0);

    if max_val == min_val {
        return Ok(QParams { scheme, dtype, scale: 1.0, zero_point: 0 });
    }

    let eps = f64::from(f32::EPSILON);
    let (scale, zero_point) = match scheme {
        QuantScheme::Symmetric => {
            let max_val = f64::from((-min_val).max(max_val));
            let scale = (max_val / (f64::from(qmax - qmin) / 2.0)).max(eps);
            let zero_point = match dtype {
                QuantDType::Signed8 => 0,
                QuantDType::Unsigned8 => 128,
            };
            (scale, zero_point)
        }
        QuantScheme::Affine => {
            let range = f64::from(max_val) - f64::from(min_val);
            let scale = (range / f64::from(qmax - qmin)).max(eps);
            let zero_point = f64::from(qmin) - (f64::from(min_val) / scale).round();
            (scale, (zero_point as i32).clamp(qmin, qmax))
        }
    };

    Ok(QParams { scheme, dtype, scale, zero_point })
}
