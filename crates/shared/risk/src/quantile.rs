//! Empirical quantiles with linear interpolation

/// Compute a single quantile from a sorted slice using linear interpolation.
/// `p` is clamped to [0, 1]. Returns NaN for empty slices.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let p = p.clamp(0.0, 1.0);
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let idx = p * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi || hi >= n {
        return sorted[lo.min(n - 1)];
    }
    let w = idx - lo as f64;
    sorted[lo] * (1.0 - w) + sorted[hi] * w
}

/// Finite values of `data`, sorted ascending
pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    finite.sort_by(f64::total_cmp);
    finite
}
