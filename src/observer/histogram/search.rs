//! Non-linear min/max search over a histogram
//!
//! Approximates L2 error minimization for selecting the clipping range:
//! outliers in the input distribution are traded off against resolution
//! loss over the 256 destination bins.

use crate::error::{CalibrationError, Result};

use super::types::NormType;

/// Number of destination bins the chosen range is remapped onto (8-bit).
pub(crate) const DST_NBINS: usize = 256;

/// Quantile step taken per search iteration.
const STEP_SIZE: f64 = 1e-5;

/// L2 norm of values uniformly distributed between `delta_begin` and
/// `delta_end`:
///
/// norm = density * (integral_{begin, end} x^2)
///      = density * (end^3 - begin^3) / 3
fn l2_norm(delta_begin: f64, delta_end: f64, density: f64) -> f64 {
    density * (delta_end * delta_end * delta_end - delta_begin * delta_begin * delta_begin) / 3.0
}

/// Quantization error if `[next_start_bin, next_end_bin]` is used as the
/// clipping range and remapped onto [`DST_NBINS`] destination bins.
///
/// Every source bin is treated as a uniform density; its overlap with each
/// destination bin contributes the analytic L2 integral of the distance to
/// that destination bin's center. Source bins outside the candidate range
/// contribute their clipping error against the nearest edge bin.
pub(crate) fn compute_quantization_error(
    histogram: &[f64],
    min_val: f32,
    max_val: f32,
    next_start_bin: usize,
    next_end_bin: usize,
) -> f64 {
    let bins = histogram.len();
    let bin_width = (f64::from(max_val) - f64::from(min_val)) / bins as f64;
    let dst_bin_width = bin_width * (next_end_bin - next_start_bin + 1) as f64 / DST_NBINS as f64;

    let mut norm = 0.0;
    for (src_bin, &count) in histogram.iter().enumerate() {
        // distances from the beginning of the first dst_bin to the beginning
        // and end of src_bin
        let src_bin_begin = (src_bin as f64 - next_start_bin as f64) * bin_width;
        let src_bin_end = src_bin_begin + bin_width;

        // which dst_bins the beginning and end of src_bin fall into
        let dst_bin_of_begin =
            (src_bin_begin / dst_bin_width).floor().clamp(0.0, (DST_NBINS - 1) as f64);
        let dst_bin_of_end =
            (src_bin_end / dst_bin_width).floor().clamp(0.0, (DST_NBINS - 1) as f64);
        let dst_bin_of_begin_center = dst_bin_of_begin * dst_bin_width + dst_bin_width / 2.0;

        let density = count / bin_width;
        if dst_bin_of_begin == dst_bin_of_end {
            // src_bin is entirely within one dst_bin
            let delta_begin = src_bin_begin - dst_bin_of_begin_center;
            let delta_end = src_bin_end - dst_bin_of_begin_center;
            norm += l2_norm(delta_begin, delta_end, density);
        } else {
            let delta_begin = src_bin_begin - dst_bin_of_begin_center;
            norm += l2_norm(delta_begin, dst_bin_width / 2.0, density);

            norm += (dst_bin_of_end - dst_bin_of_begin - 1.0)
                * l2_norm(-dst_bin_width / 2.0, dst_bin_width / 2.0, density);

            let dst_bin_of_end_center = dst_bin_of_end * dst_bin_width + dst_bin_width / 2.0;
            let delta_end = src_bin_end - dst_bin_of_end_center;
            norm += l2_norm(-dst_bin_width / 2.0, delta_end, density);
        }
    }
    norm
}

/// Search for the sub-range of histogram bins that minimizes quantization
/// error, mapped back to floating-point bounds.
///
/// A greedy two-pointer coordinate descent over cumulative mass quantiles:
/// each step advances whichever bound would drop more bins, evaluates the
/// candidate's error, and stops on the first regression. Monotonic
/// improvement is assumed, not guaranteed, so the result is local, not
/// globally optimal.
///
/// # Errors
///
/// `UnsupportedNorm` for any norm other than `L2`.
pub(crate) fn non_linear_param_search(
    histogram: &[f64],
    min_val: f32,
    max_val: f32,
    norm_type: NormType,
) -> Result<(f32, f32)> {
    if norm_type != NormType::L2 {
        return Err(CalibrationError::UnsupportedNorm(norm_type));
    }

    let bins = histogram.len();
    let total: f64 = histogram.iter().sum();
    let cumulative: Vec<f64> = histogram
        .iter()
        .scan(0.0, |acc, &count| {
            *acc += count;
            Some(*acc)
        })
        .collect();

    let mut alpha = 0.0f64;
    let mut beta = 1.0f64;
    let mut start_bin = 0usize;
    let mut end_bin = bins - 1;
    let mut norm_min = f64::INFINITY;

    while alpha < beta {
        let next_alpha = alpha + STEP_SIZE;
        let next_beta = beta - STEP_SIZE;

        // left and right bins between the quantile bounds
        let mut l = start_bin;
        let mut r = end_bin;
        while l < end_bin && cumulative[l] < next_alpha * total {
            l += 1;
        }
        while r > start_bin && cumulative[r] > next_beta * total {
            r -= 1;
        }

        // advance whichever side drops more bins, keep the other fixed
        let mut next_start_bin = start_bin;
        let mut next_end_bin = end_bin;
        if l - start_bin > end_bin - r {
            next_start_bin = l;
            alpha = next_alpha;
        } else {
            next_end_bin = r;
            beta = next_beta;
        }

        if next_start_bin == start_bin && next_end_bin == end_bin {
            continue;
        }

        let norm =
            compute_quantization_error(histogram, min_val, max_val, next_start_bin, next_end_bin);

        if norm > norm_min {
            break;
        }
        norm_min = norm;
        start_bin = next_start_bin;
        end_bin = next_end_bin;
    }

    let bin_width = (f64::from(max_val) - f64::from(min_val)) / bins as f64;
    let new_min = (f64::from(min_val) + bin_width * start_bin as f64) as f32;
    let new_max = (f64::from(min_val) + bin_width * (end_bin + 1) as f64) as f32;
    Ok((new_min, new_max))
}
