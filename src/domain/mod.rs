//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - input rows and their asset-class tag (`Observation`, `AssetClass`, `Dataset`)
//! - date-indexed wide tables (`Table`, `SeriesTable`, `SeriesKey`, `PairKey`)
//! - summary outputs (`ValueSummary`, `CoverageReport`)
//! - run settings (`ChartConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
