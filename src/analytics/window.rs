//! Non-overlapping window statistics over a returns table.
//!
//! Each window of `window` consecutive rows yields one output row, dated at the
//! window's last row. A trailing partial window is dropped so every value is
//! computed from the same number of periods.

use nalgebra::DMatrix;
use tracing::debug;

use crate::domain::{Column, PairKey, SeriesKey, SeriesTable, Table};
use crate::error::SurveyError;
use crate::math::{correlation_matrix as corr_of, pearson, sample_std};

/// Full-period correlation of every pair of series.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub keys: Vec<SeriesKey>,
    pub matrix: DMatrix<f64>,
}

/// Sample standard deviation of each column per window.
pub fn windowed_std(returns: &SeriesTable, window: usize) -> Result<SeriesTable, SurveyError> {
    let bounds = window_bounds(returns.n_rows(), window)?;

    let mut out = Table::new(bounds.iter().map(|r| returns.index[r.end - 1]).collect());
    for column in &returns.columns {
        let values = bounds.iter().map(|r| sample_std(&column.values[r.clone()])).collect();
        out.columns.push(Column {
            key: column.key.clone(),
            values,
        });
    }

    debug!(windows = out.n_rows(), window, "computed windowed std");
    Ok(out)
}

/// Pearson correlation of every column pair `(i < j)` per window.
pub fn windowed_corr(returns: &SeriesTable, window: usize) -> Result<Table<PairKey>, SurveyError> {
    let bounds = window_bounds(returns.n_rows(), window)?;

    let mut out = Table::new(bounds.iter().map(|r| returns.index[r.end - 1]).collect());
    for (i, a) in returns.columns.iter().enumerate() {
        for b in &returns.columns[i + 1..] {
            let values = bounds
                .iter()
                .map(|r| pearson(&a.values[r.clone()], &b.values[r.clone()]))
                .collect();
            out.columns.push(Column {
                key: PairKey {
                    first: a.key.clone(),
                    second: b.key.clone(),
                },
                values,
            });
        }
    }

    debug!(windows = out.n_rows(), pairs = out.n_cols(), window, "computed windowed correlation");
    Ok(out)
}

/// Correlation matrix of all columns over the whole table.
pub fn correlation_matrix(returns: &SeriesTable) -> CorrelationMatrix {
    let columns: Vec<&[f64]> = returns.columns.iter().map(|c| c.values.as_slice()).collect();
    CorrelationMatrix {
        keys: returns.columns.iter().map(|c| c.key.clone()).collect(),
        matrix: corr_of(&columns),
    }
}

fn window_bounds(n_rows: usize, window: usize) -> Result<Vec<std::ops::Range<usize>>, SurveyError> {
    if window == 0 {
        return Err(SurveyError::InvalidArgument("window must be > 0".to_string()));
    }
    let n_windows = n_rows / window;
    if n_windows == 0 {
        return Err(SurveyError::EmptyDataset(format!(
            "{n_rows} return(s) is less than one window of {window}"
        )));
    }
    Ok((0..n_windows).map(|w| w * window..(w + 1) * window).collect())
}
