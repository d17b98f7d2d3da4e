//! Shared steps used by both the CLI handlers and the TUI.
//!
//! load -> pivot -> (currency filter) -> returns -> windowed statistics -> chart
//!
//! Front-ends only decide how to present the results (print, SVG, widgets).

use std::path::Path;

use tracing::{debug, info};

use crate::analytics::{self, CorrelationMatrix};
use crate::chart::{self, BoxPlot, LineChart};
use crate::cli::{ChartArgs, PlotWindowArgs, SampleArgs};
use crate::domain::{ChartConfig, Dataset, SampleConfig, SeriesTable};
use crate::error::{AppError, SurveyError};

/// Load observations and log a short overview.
pub fn load(path: &Path) -> Result<Dataset, AppError> {
    let dataset = crate::io::load_dataset(path)?;
    if let Some((lo, hi)) = dataset.date_range() {
        info!(rows = dataset.len(), from = %lo, to = %hi, "dataset ready");
    }
    Ok(dataset)
}

/// Pivoted values restricted to the configured currencies.
pub fn series_table(dataset: &Dataset, config: &ChartConfig) -> Result<SeriesTable, AppError> {
    let table = crate::summary::pivot(dataset);
    let table = if config.currencies.is_empty() {
        table
    } else {
        table.select(|k| config.currencies.iter().any(|c| c.eq_ignore_ascii_case(&k.currency)))
    };

    if table.is_empty() {
        return Err(SurveyError::EmptyDataset(format!(
            "no series left for currencies {:?}",
            config.currencies
        ))
        .into());
    }
    debug!(rows = table.n_rows(), cols = table.n_cols(), "pivoted series table");
    Ok(table)
}

/// Sampled returns of the filtered series table.
pub fn returns_table(dataset: &Dataset, config: &ChartConfig) -> Result<SeriesTable, AppError> {
    let table = series_table(dataset, config)?;
    Ok(analytics::returns(&table, config.return_days)?)
}

pub fn data_chart(dataset: &Dataset, config: &ChartConfig) -> Result<LineChart, AppError> {
    Ok(chart::plot_data_table(&series_table(dataset, config)?))
}

pub fn volatility_chart(dataset: &Dataset, config: &ChartConfig) -> Result<BoxPlot, AppError> {
    let returns = returns_table(dataset, config)?;
    let std = analytics::windowed_std(&returns, config.window)?;
    Ok(chart::plot_volatility_distribution(&std, config.return_days)?)
}

/// Rolling-correlation box plot plus the full-period matrix.
pub fn correlation_chart(dataset: &Dataset, config: &ChartConfig) -> Result<(BoxPlot, CorrelationMatrix), AppError> {
    let returns = returns_table(dataset, config)?;
    if returns.n_cols() < 2 {
        return Err(SurveyError::EmptyDataset("correlation needs at least two series".to_string()).into());
    }
    let corr = analytics::windowed_corr(&returns, config.window)?;
    debug!(pairs = corr.n_cols(), windows = corr.n_rows(), "computed rolling correlations");
    Ok((chart::plot_correlation_distribution(&corr), analytics::correlation_matrix(&returns)))
}

pub fn chart_config_from_args(args: &ChartArgs) -> ChartConfig {
    ChartConfig {
        width: args.width,
        height: args.height,
        currencies: args.currencies.clone(),
        ..ChartConfig::default()
    }
}

pub fn window_config_from_args(args: &PlotWindowArgs) -> ChartConfig {
    ChartConfig {
        return_days: args.return_days,
        window: args.window,
        ..chart_config_from_args(&args.chart)
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        seed: args.seed,
        start: args.start,
        days: args.days,
        currencies: args.currencies.clone(),
        tenors: args.tenors.clone(),
        drop_prob: args.drop_prob,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Dataset {
        crate::data::generate_sample(&SampleConfig {
            seed: 3,
            start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            days: 400,
            currencies: vec!["EUR".to_string(), "USD".to_string()],
            tenors: vec![24, 120],
            drop_prob: 0.05,
        })
        .unwrap()
    }

    #[test]
    fn currency_filter_is_case_insensitive() {
        let config = ChartConfig {
            currencies: vec!["usd".to_string()],
            ..ChartConfig::default()
        };
        let table = series_table(&sample(), &config).unwrap();
        assert_eq!(table.n_cols(), 3);
        assert!(table.columns.iter().all(|c| c.key.currency == "USD"));
    }

    #[test]
    fn unknown_currency_is_a_data_error() {
        let config = ChartConfig {
            currencies: vec!["CHF".to_string()],
            ..ChartConfig::default()
        };
        assert_eq!(series_table(&sample(), &config).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn volatility_and_correlation_charts_cover_every_series() {
        let ds = sample();
        let config = ChartConfig::default();

        let vol = volatility_chart(&ds, &config).unwrap();
        assert_eq!(vol.groups.len(), 6);
        assert!(vol.groups.iter().all(|g| !g.values.is_empty()));

        let (corr, matrix) = correlation_chart(&ds, &config).unwrap();
        assert_eq!(corr.groups.len(), 15);
        assert_eq!(matrix.keys.len(), 6);
        assert!((matrix.matrix[(0, 0)] - 1.0).abs() < 1e-12);
    }
}
