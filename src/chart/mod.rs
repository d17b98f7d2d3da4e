//! Chart objects and their preparation.
//!
//! Charts are plain data: the transform functions build them from tables and
//! the renderers (`svg`, the TUI widget) draw them. Keeping the two apart lets
//! the scaling/labeling rules be tested without a drawing backend.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

pub mod svg;
pub mod term;
pub mod transform;

pub use svg::render_svg;
pub use term::{normalised_term, term_from_months};
pub use transform::{plot_correlation_distribution, plot_data_table, plot_volatility_distribution, rebase};

/// One line of a [`LineChart`], aligned with the chart's dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeriesData {
    pub label: String,
    pub values: Vec<f64>,
}

/// Multi-series line chart over a date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<LineSeriesData>,
}

/// The sample behind one box of a [`BoxPlot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// Distribution chart: one box per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chart {
    Line(LineChart),
    Box(BoxPlot),
}

impl Chart {
    /// Render to an SVG document.
    pub fn to_svg(&self, width: u32, height: u32) -> Result<String, AppError> {
        svg::render_svg(self, width, height)
    }
}

impl From<LineChart> for Chart {
    fn from(value: LineChart) -> Self {
        Chart::Line(value)
    }
}

impl From<BoxPlot> for Chart {
    fn from(value: BoxPlot) -> Self {
        Chart::Box(value)
    }
}
