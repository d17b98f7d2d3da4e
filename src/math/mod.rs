//! Mathematical utilities: NaN-aware descriptive statistics and correlation.

pub mod corr;
pub mod stats;

pub use corr::*;
pub use stats::*;
