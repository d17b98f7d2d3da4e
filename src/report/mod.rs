//! Reporting utilities: fixed-width terminal tables for summaries.

pub mod format;

pub use format::*;
