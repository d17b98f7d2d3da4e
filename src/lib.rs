//! `rates-survey` library crate.
//!
//! The binary (`survey`) is a thin wrapper around this library so that:
//!
//! - summaries and chart preparation are testable without spawning processes
//! - the same steps back both the CLI and the terminal browser

pub mod analytics;
pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod summary;
pub mod tui;
