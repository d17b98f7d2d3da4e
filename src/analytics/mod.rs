//! Derived tables for the distribution charts.
//!
//! returns -> windowed std (volatility chart) / windowed correlation (correlation chart)

pub mod returns;
pub mod window;

pub use returns::returns;
pub use window::{correlation_matrix, windowed_corr, windowed_std, CorrelationMatrix};
