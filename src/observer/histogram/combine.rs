//! Histogram merge primitive

/// Redistribute the counts of `src` (over `[src_min, src_max]`) into `dst`
/// (over `[dst_min, dst_max]`) in proportion to range overlap.
///
/// Each source bin's count is split across at most two destination bins,
/// which holds by construction whenever the destination bin width is at
/// least the source bin width; a wider spread is a programming-invariant
/// violation and panics.
///
/// Supports merging calibration statistics gathered independently, e.g.
/// per-worker histograms from sharded data, as an explicit serial
/// reduction step.
///
/// # Panics
///
/// Panics if a source bin would span more than two destination bins.
pub fn combine_histograms(
    dst: &mut [f64],
    dst_min: f32,
    dst_max: f32,
    src: &[f64],
    src_min: f32,
    src_max: f32,
) {
    let bins_dst = dst.len();
    let bins_src = src.len();

    let dst_bin_width = (f64::from(dst_max) - f64::from(dst_min)) / bins_dst as f64;
    let src_bin_width = (f64::from(src_max) - f64::from(src_min)) / bins_src as f64;

    for (i, &src_bin_count) in src.iter().enumerate() {
        if src_bin_count == 0.0 {
            continue;
        }

        let src_bin_begin = f64::from(src_min) + src_bin_width * i as f64;
        let src_bin_end = src_bin_begin + src_bin_width;

        let dst_bin = if dst_bin_width > 0.0 {
            (((src_bin_begin - f64::from(dst_min)) / dst_bin_width) as usize).min(bins_dst - 1)
        } else {
            0
        };
        let dst_bin_end_edge = f64::from(dst_min) + dst_bin_width * (dst_bin + 1) as f64;

        let dst_bin2 = if dst_bin_width > 0.0 {
            (((src_bin_end - f64::from(dst_min)) / dst_bin_width) as usize).min(bins_dst - 1)
        } else {
            0
        };

        assert!(dst_bin2 <= dst_bin + 2, "one src bin must map to at most two dst bins");

        // count from src_bin that lands in dst_bin; the remainder goes to dst_bin2
        let dst_bin_cnt = if src_bin_width == 0.0 || dst_bin_width == 0.0 {
            src_bin_count
        } else {
            (((dst_bin_end_edge - src_bin_begin) / src_bin_width * src_bin_count).round())
                .min(src_bin_count)
        };

        dst[dst_bin] += dst_bin_cnt;

        if dst_bin_cnt < src_bin_count {
            dst[dst_bin2] += src_bin_count - dst_bin_cnt;
        }
    }
}
