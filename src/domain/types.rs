//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built in-memory by the loader or the sample generator
//! - summarized and charted without any table library
//! - exported to JSON/CSV

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

/// What kind of instrument a series quotes.
///
/// FX series are price levels (charted in log space, volatility in %).
/// Rate series are decimal interest rates (volatility in bp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Fx,
    Rate,
}

impl AssetClass {
    /// Data-source convention: a zero tenor is an FX level, anything else a rate.
    ///
    /// Only the loader should rely on this; everything downstream reads the tag.
    pub fn from_months(months: u32) -> Self {
        if months == 0 { AssetClass::Fx } else { AssetClass::Rate }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fx" => Some(AssetClass::Fx),
            "rate" | "rates" | "ir" => Some(AssetClass::Rate),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AssetClass::Fx => "fx",
            AssetClass::Rate => "rate",
        }
    }

    /// Multiplier turning a decimal volatility into display units (% for FX, bp for rates).
    pub fn volatility_unit_scale(self) -> f64 {
        match self {
            AssetClass::Fx => 100.0,
            AssetClass::Rate => 10_000.0,
        }
    }
}

/// One row of the input dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub currency: String,
    /// Tenor label, e.g. `1Y6M`.
    pub term: String,
    /// Tenor in months.
    pub months: u32,
    /// Rate or FX level. NaN when the source cell was empty.
    pub value: f64,
    pub asset: AssetClass,
}

impl Observation {
    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            currency: self.currency.clone(),
            months: self.months,
            term: self.term.clone(),
            asset: self.asset,
        }
    }
}

/// An ordered collection of observations (file order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Earliest and latest observation dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.first()?.date;
        Some(self.observations.iter().fold((first, first), |(lo, hi), o| {
            (lo.min(o.date), hi.max(o.date))
        }))
    }
}

/// Identity of one series: (currency, tenor) plus its asset class.
///
/// Ordering is `(currency, months, term)`, the order a pivot table sorts its
/// columns in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub currency: String,
    pub months: u32,
    pub term: String,
    pub asset: AssetClass,
}

impl Ord for SeriesKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.currency
            .cmp(&other.currency)
            .then(self.months.cmp(&other.months))
            .then_with(|| self.term.cmp(&other.term))
            .then(self.asset.cmp(&other.asset))
    }
}

impl PartialOrd for SeriesKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Two series whose co-movement a correlation column describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub first: SeriesKey,
    pub second: SeriesKey,
}

/// How a table column presents itself to the chart layer.
pub trait ColumnLabel {
    /// Flattened single-string label.
    fn label(&self) -> String;
}

impl ColumnLabel for SeriesKey {
    fn label(&self) -> String {
        format!("{}_{}", self.currency, self.term)
    }
}

impl ColumnLabel for PairKey {
    fn label(&self) -> String {
        format!("{}/{}", self.first.label(), self.second.label())
    }
}

/// One column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column<K> {
    pub key: K,
    pub values: Vec<f64>,
}

/// A date-indexed wide table. Missing cells are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<K> {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<Column<K>>,
}

/// Values pivoted by date, one column per series.
pub type SeriesTable = Table<SeriesKey>;

impl<K> Table<K> {
    pub fn new(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Append a column; it must have exactly one value per index date.
    pub fn push_column(&mut self, key: K, values: Vec<f64>) -> Result<(), SurveyError> {
        if values.len() != self.index.len() {
            return Err(SurveyError::InvalidArgument(format!(
                "column has {} values but the index has {} dates",
                values.len(),
                self.index.len()
            )));
        }
        self.columns.push(Column { key, values });
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// Apply `f` to every column, keeping keys and index.
    pub fn map_columns<F>(&self, mut f: F) -> Table<K>
    where
        K: Clone,
        F: FnMut(&K, &[f64]) -> Vec<f64>,
    {
        Table {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    key: c.key.clone(),
                    values: f(&c.key, &c.values),
                })
                .collect(),
        }
    }
}

impl SeriesTable {
    /// Keep only the columns matching `keep`.
    pub fn select<F>(&self, mut keep: F) -> SeriesTable
    where
        F: FnMut(&SeriesKey) -> bool,
    {
        Table {
            index: self.index.clone(),
            columns: self.columns.iter().filter(|c| keep(&c.key)).cloned().collect(),
        }
    }
}

/// Descriptive statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// One row of the value summary: a series and its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSummaryRow {
    pub currency: String,
    pub months: u32,
    pub term: String,
    pub asset: AssetClass,
    #[serde(flatten)]
    pub stats: ValueStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueSummary {
    pub rows: Vec<ValueSummaryRow>,
}

/// One row of the coverage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub currency: String,
    pub term: String,
    pub months: u32,
    pub min: NaiveDate,
    pub max: NaiveDate,
    /// Largest run of consecutive calendar days without an observation.
    pub gap: i64,
    /// Fraction of the date span covered by observations.
    pub fill: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    pub fn find(&self, currency: &str, term: &str) -> Option<&CoverageRow> {
        self.rows.iter().find(|r| r.currency == currency && r.term == term)
    }
}

/// Settings for the derived tables and the SVG output of chart commands.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// Sampling interval of returns, in calendar days.
    pub return_days: u32,
    /// Number of returns per volatility/correlation window.
    pub window: usize,
    /// Restrict charts to these currencies (empty = all).
    pub currencies: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            return_days: 7,
            window: 26,
            currencies: Vec::new(),
        }
    }
}

/// Settings for the synthetic dataset generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub seed: u64,
    pub start: NaiveDate,
    /// Calendar days to cover (weekends are skipped).
    pub days: u32,
    pub currencies: Vec<String>,
    /// Rate tenors in months (an FX series with tenor 0 is always added).
    pub tenors: Vec<u32>,
    /// Probability of dropping a business day from a series.
    pub drop_prob: f64,
}
