//! Value pivot and per-series descriptive statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Column, Dataset, SeriesKey, SeriesTable, Table, ValueSummary, ValueSummaryRow};
use crate::error::SurveyError;
use crate::math::describe;

/// Pivot VALUE by DATE (rows) and series (columns).
///
/// - rows: sorted dates with at least one finite value
/// - columns: series sorted by `(currency, months, term)`; all-NaN columns dropped
/// - duplicate (date, series) cells are averaged
pub fn pivot(dataset: &Dataset) -> SeriesTable {
    let mut cells: BTreeMap<SeriesKey, BTreeMap<NaiveDate, (f64, usize)>> = BTreeMap::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for obs in dataset.iter() {
        let column = cells.entry(obs.key()).or_default();
        if !obs.value.is_finite() {
            continue;
        }
        let cell = column.entry(obs.date).or_insert((0.0, 0));
        cell.0 += obs.value;
        cell.1 += 1;
        dates.insert(obs.date);
    }

    let index: Vec<NaiveDate> = dates.into_iter().collect();
    let mut table = Table::new(index);

    for (key, column) in cells {
        if column.is_empty() {
            debug!(series = %key.currency, term = %key.term, "dropping all-NaN column");
            continue;
        }
        let values = table
            .index
            .iter()
            .map(|d| match column.get(d) {
                Some(&(sum, n)) => sum / n as f64,
                None => f64::NAN,
            })
            .collect();
        table.columns.push(Column { key, values });
    }

    table
}

/// Descriptive statistics per series, one row per pivot column.
pub fn describe_values(dataset: &Dataset) -> Result<ValueSummary, SurveyError> {
    if dataset.is_empty() {
        return Err(SurveyError::EmptyDataset("no observations to describe".to_string()));
    }

    let table = pivot(dataset);
    debug!(rows = table.n_rows(), columns = table.n_cols(), "pivoted values");

    let rows = table
        .columns
        .iter()
        .map(|c| ValueSummaryRow {
            currency: c.key.currency.clone(),
            months: c.key.months,
            term: c.key.term.clone(),
            asset: c.key.asset,
            stats: describe(&c.values),
        })
        .collect();

    Ok(ValueSummary { rows })
}
