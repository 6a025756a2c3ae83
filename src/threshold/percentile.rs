//! Percentile cutoff over a magnitude distribution.
//!
//! Uses linear interpolation between the two nearest order statistics
//! (rank `p / 100 · (n − 1)`), so `p = 0` is the minimum and `p = 100` the
//! maximum. Selection is `O(n)` via `select_nth_unstable_by`.

/// Percentile `p ∈ [0, 100]` of `values`; 0 for an empty slice.
pub fn percentile(values: &[f32], p: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len();
    let rank = (p as f64 / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;

    let mut scratch = values.to_vec();
    let (_, &mut lo_val, upper) = scratch.select_nth_unstable_by(lo, f32::total_cmp);
    if frac == 0.0 || upper.is_empty() {
        return lo_val;
    }
    let hi_val = upper
        .iter()
        .copied()
        .min_by(f32::total_cmp)
        .unwrap_or(lo_val);
    let value = lo_val as f64 + frac * (hi_val as f64 - lo_val as f64);
    (value as f32).min(hi_val)
}
