//! Descriptive statistics over columns that may contain NaN.
//!
//! Conventions match the usual dataframe `describe()`:
//! - NaN cells are ignored (they only reduce `count`)
//! - `std` is the sample standard deviation (`n - 1` denominator)
//! - quantiles interpolate linearly between the two closest ranks

use crate::domain::ValueStats;

/// Finite values of `values`, in order.
pub fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean of the finite values (NaN when there are none).
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sample standard deviation of the finite values (NaN when fewer than 2).
pub fn sample_std(values: &[f64]) -> f64 {
    let vals = finite(values);
    let n = vals.len();
    if n < 2 {
        return f64::NAN;
    }

    // Welford's update keeps the sum of squared deviations stable for
    // level-like series (e.g. FX around 100+).
    let mut m = 0.0;
    let mut m2 = 0.0;
    for (i, x) in vals.iter().enumerate() {
        let delta = x - m;
        m += delta / (i + 1) as f64;
        m2 += delta * (x - m);
    }
    (m2 / (n - 1) as f64).sqrt()
}

/// Quantile `q ∈ [0, 1]` of already-sorted finite values, linear interpolation.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Count, mean, std, min, quartiles and max of one column.
pub fn describe(values: &[f64]) -> ValueStats {
    let mut sorted = finite(values);
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    ValueStats {
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.50),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}
