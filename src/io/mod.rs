//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - summary exports (CSV/JSON) and chart files (SVG) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
