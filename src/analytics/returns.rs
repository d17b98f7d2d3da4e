//! Periodic changes of pivoted series on a calendar grid.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::domain::{AssetClass, Column, SeriesTable, Table};
use crate::error::SurveyError;

/// Changes over `return_days` calendar days.
///
/// The table is sampled on a grid starting at its first date and stepping
/// `return_days` days; each grid date takes the last finite value at or before
/// it. Consecutive samples then give:
///
/// - FX:   `ln(v_t / v_{t-1})`
/// - rate: `v_t - v_{t-1}`
///
/// The result is indexed by the grid dates from the second sample on.
pub fn returns(table: &SeriesTable, return_days: u32) -> Result<SeriesTable, SurveyError> {
    if return_days == 0 {
        return Err(SurveyError::InvalidArgument("return_days must be > 0".to_string()));
    }
    let (Some(&first), Some(&last)) = (table.index.first(), table.index.last()) else {
        return Err(SurveyError::EmptyDataset("no dates to compute returns from".to_string()));
    };

    let grid = calendar_grid(first, last, return_days);
    if grid.len() < 2 {
        return Err(SurveyError::EmptyDataset(format!(
            "history from {first} to {last} is shorter than one {return_days}-day return"
        )));
    }

    let mut out = Table::new(grid[1..].to_vec());
    for column in &table.columns {
        let sampled = sample_as_of(&table.index, &column.values, &grid);
        let changes = sampled
            .windows(2)
            .map(|w| change(column.key.asset, w[0], w[1]))
            .collect();
        out.columns.push(Column {
            key: column.key.clone(),
            values: changes,
        });
    }

    debug!(rows = out.n_rows(), columns = out.n_cols(), return_days, "computed returns");
    Ok(out)
}

fn change(asset: AssetClass, prev: f64, cur: f64) -> f64 {
    match asset {
        AssetClass::Fx => (cur / prev).ln(),
        AssetClass::Rate => cur - prev,
    }
}

fn calendar_grid(first: NaiveDate, last: NaiveDate, step_days: u32) -> Vec<NaiveDate> {
    let step = Duration::days(i64::from(step_days));
    let mut grid = Vec::new();
    let mut d = first;
    while d <= last {
        grid.push(d);
        d += step;
    }
    grid
}

/// Last finite value at or before each grid date (NaN before the first one).
fn sample_as_of(index: &[NaiveDate], values: &[f64], grid: &[NaiveDate]) -> Vec<f64> {
    let mut out = Vec::with_capacity(grid.len());
    let mut row = 0usize;
    let mut last_finite = f64::NAN;
    for &g in grid {
        while row < index.len() && index[row] <= g {
            if values[row].is_finite() {
                last_finite = values[row];
            }
            row += 1;
        }
        out.push(last_finite);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesKey;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i)
    }

    fn key(months: u32) -> SeriesKey {
        SeriesKey {
            currency: "EUR".to_string(),
            months,
            term: if months == 0 { "FX".to_string() } else { format!("{months}M") },
            asset: AssetClass::from_months(months),
        }
    }

    #[test]
    fn weekly_changes_use_as_of_values() {
        // Daily index over 15 days; day 7 missing for the rate column.
        let index: Vec<NaiveDate> = (0..15).map(day).collect();
        let mut table: SeriesTable = Table::new(index);
        let fx: Vec<f64> = (0..15).map(|i| 100.0 * (0.01 * i as f64).exp()).collect();
        let mut rate: Vec<f64> = (0..15).map(|i| 0.01 + 0.001 * i as f64).collect();
        rate[7] = f64::NAN;
        table.push_column(key(0), fx).unwrap();
        table.push_column(key(12), rate).unwrap();

        let r = returns(&table, 7).unwrap();
        assert_eq!(r.index, vec![day(7), day(14)]);

        // FX log change over 7 days = 0.07.
        assert!((r.columns[0].values[0] - 0.07).abs() < 1e-12);
        assert!((r.columns[0].values[1] - 0.07).abs() < 1e-12);

        // Rate on day 7 falls back to day 6: 0.016 - 0.010, then 0.024 - 0.016.
        assert!((r.columns[1].values[0] - 0.006).abs() < 1e-12);
        assert!((r.columns[1].values[1] - 0.008).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_interval_and_short_history() {
        let mut table: SeriesTable = Table::new(vec![day(0), day(1)]);
        table.push_column(key(12), vec![0.01, 0.02]).unwrap();
        assert!(matches!(returns(&table, 0), Err(SurveyError::InvalidArgument(_))));
        assert!(matches!(returns(&table, 7), Err(SurveyError::EmptyDataset(_))));
    }
}
