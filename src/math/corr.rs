//! Pearson correlation on top of `nalgebra`.
//!
//! Columns are compared over the rows where both are finite (pairwise
//! deletion), so a gap in one series does not discard the whole window.

use nalgebra::{DMatrix, DVector};

/// Pearson correlation of `x` and `y` over rows where both are finite.
///
/// Returns NaN with fewer than 2 usable rows or when either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip();

    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mut xv = DVector::from_vec(xs);
    let mut yv = DVector::from_vec(ys);
    xv.add_scalar_mut(-xv.mean());
    yv.add_scalar_mut(-yv.mean());

    let denom = xv.norm() * yv.norm();
    if denom <= f64::EPSILON {
        return f64::NAN;
    }
    (xv.dot(&yv) / denom).clamp(-1.0, 1.0)
}

/// Symmetric correlation matrix of `columns` (unit diagonal).
pub fn correlation_matrix(columns: &[&[f64]]) -> DMatrix<f64> {
    let n = columns.len();
    let mut out = DMatrix::from_element(n, n, f64::NAN);
    for i in 0..n {
        out[(i, i)] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(columns[i], columns[j]);
            out[(i, j)] = r;
            out[(j, i)] = r;
        }
    }
    out
}
