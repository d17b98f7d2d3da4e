//! Summaries of an observation dataset.
//!
//! - `values`: pivot by date and per-series descriptive statistics
//! - `dates`: per-series date coverage (span, largest gap, fill ratio)
//!
//! Both are recomputed from scratch on every call; nothing is cached.

pub mod dates;
pub mod values;

pub use dates::{describe_dates, group_series, SeriesGroup};
pub use values::{describe_values, pivot};
