//! Quantization parameter derivation
//!
//! Converts an observed floating-point range into affine or symmetric
//! per-tensor quantization parameters (scale, zero_point) for 8-bit
//! signed or unsigned targets:
//! - **Affine**: scale from the full range, zero_point chosen so that
//!   0.0f is exactly representable
//! - **Symmetric**: range reflected around zero, zero_point fixed per dtype
//!
//! Both observer strategies delegate here; the derivation itself is a pure
//! function with no observer state.

mod calculate;
mod types;


pub use calculate::calculate_qparams;
pub use types::{QParams, QuantDType, QuantScheme};
