//! Table -> chart transformations.
//!
//! These functions only prepare data (scaling, rebasing, labeling); drawing is
//! done by `chart::svg` or the TUI. Inputs are borrowed and never mutated.

use crate::chart::term::term_from_months;
use crate::chart::{BoxGroup, BoxPlot, LineChart, LineSeriesData};
use crate::domain::{AssetClass, ColumnLabel, SeriesTable, Table};
use crate::error::SurveyError;

pub const DATA_X_LABEL: &str = "Date";
pub const DATA_Y_LABEL: &str = "Normalised rate";
pub const DISTRIBUTION_X_LABEL: &str = "Currency";
pub const VOLATILITY_Y_LABEL: &str = "Volatility (% for FX, bp for rates)";
pub const CORRELATION_Y_LABEL: &str = "Correlation (%)";

/// Log FX columns, then subtract each column's first-row value.
///
/// A NaN in the first row propagates to the whole column.
pub fn rebase(table: &SeriesTable) -> SeriesTable {
    table.map_columns(|key, values| {
        let levels: Vec<f64> = match key.asset {
            AssetClass::Fx => values.iter().map(|v| v.ln()).collect(),
            AssetClass::Rate => values.to_vec(),
        };
        let base = levels.first().copied().unwrap_or(f64::NAN);
        levels.iter().map(|v| v - base).collect()
    })
}

/// Rebased comparison chart of every series in `table`.
pub fn plot_data_table(table: &SeriesTable) -> LineChart {
    let rebased = rebase(table);
    LineChart {
        title: "Rebased series".to_string(),
        x_label: DATA_X_LABEL.to_string(),
        y_label: DATA_Y_LABEL.to_string(),
        dates: rebased.index.clone(),
        series: rebased
            .columns
            .into_iter()
            .map(|c| LineSeriesData {
                label: c.key.label(),
                values: c.values,
            })
            .collect(),
    }
}

/// Annualized volatility per series in display units.
///
/// Values are scaled by `sqrt(365 / return_days)`, then by 100 for FX (%) or
/// 10 000 for rates (bp).
pub fn plot_volatility_distribution(std_table: &SeriesTable, return_days: u32) -> Result<BoxPlot, SurveyError> {
    if return_days == 0 {
        return Err(SurveyError::InvalidArgument("return_days must be > 0".to_string()));
    }
    let annualize = (365.0 / f64::from(return_days)).sqrt();

    let groups = std_table
        .columns
        .iter()
        .map(|c| {
            let scale = annualize * c.key.asset.volatility_unit_scale();
            BoxGroup {
                label: format!("{}_{}", c.key.currency, term_from_months(c.key.months)),
                values: c.values.iter().map(|v| v * scale).collect(),
            }
        })
        .collect();

    Ok(BoxPlot {
        title: format!("Annualised volatility ({return_days}-day returns)"),
        x_label: DISTRIBUTION_X_LABEL.to_string(),
        y_label: VOLATILITY_Y_LABEL.to_string(),
        groups,
    })
}

/// Correlation distribution per column, in percent.
pub fn plot_correlation_distribution<K: ColumnLabel>(corr_table: &Table<K>) -> BoxPlot {
    BoxPlot {
        title: "Correlation".to_string(),
        x_label: DISTRIBUTION_X_LABEL.to_string(),
        y_label: CORRELATION_Y_LABEL.to_string(),
        groups: corr_table
            .columns
            .iter()
            .map(|c| BoxGroup {
                label: c.key.label(),
                values: c.values.iter().map(|v| v * 100.0).collect(),
            })
            .collect(),
    }
}
