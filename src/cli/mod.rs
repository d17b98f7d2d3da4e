//! Command-line parsing for the rate/FX survey tool.
//!
//! Argument parsing and command dispatch live apart from the summary and
//! chart code; handlers in `app` turn these structs into library calls.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Environment variable consulted when `-f` is not given (also read from `.env`).
pub const DATA_ENV: &str = "SURVEY_DATA";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "survey", version, about = "Rate/FX time-series survey: summaries and charts")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Descriptive statistics of VALUE per series.
    Values(SummaryArgs),
    /// Date coverage per series: first/last date, largest gap, fill ratio.
    Dates(SummaryArgs),
    /// Line chart of every series rebased to its first observation.
    PlotData(PlotDataArgs),
    /// Box plot of rolling annualised volatility per series.
    PlotVol(PlotWindowArgs),
    /// Box plot of rolling pairwise return correlations.
    PlotCorr(PlotCorrArgs),
    /// Write a synthetic dataset (seeded random walks) to CSV.
    Sample(SampleArgs),
    /// Browse series interactively in the terminal.
    ///
    /// This is also what runs when no subcommand is given.
    Tui(InputArgs),
}

/// Where to read observations from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Observation CSV (`DATE,CURRENCY,TERM,MONTHS,VALUE[,ASSET]`).
    #[arg(short = 'f', long = "file", value_name = "CSV", env = DATA_ENV)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Export the summary table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the summary to JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

/// Options shared by the chart commands.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output SVG path.
    #[arg(short = 'o', long, value_name = "SVG")]
    pub output: PathBuf,

    /// Restrict to these currencies (repeatable). All currencies when omitted.
    #[arg(short = 'c', long = "currency", value_name = "CCY")]
    pub currencies: Vec<String>,

    /// Chart width in pixels.
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}

#[derive(Debug, Args, Clone)]
pub struct PlotDataArgs {
    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PlotWindowArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Return horizon in calendar days.
    #[arg(long, default_value_t = 7)]
    pub return_days: u32,

    /// Number of return observations per window.
    #[arg(long, default_value_t = 26)]
    pub window: usize,
}

#[derive(Debug, Args, Clone)]
pub struct PlotCorrArgs {
    #[command(flatten)]
    pub window: PlotWindowArgs,

    /// Also print the full-period correlation matrix.
    #[arg(long)]
    pub print_matrix: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First calendar date.
    #[arg(long, default_value = "2020-01-01")]
    pub start: NaiveDate,

    /// Calendar days to cover (weekends are skipped).
    #[arg(long, default_value_t = 730)]
    pub days: u32,

    /// Currencies to generate (repeatable).
    #[arg(short = 'c', long = "currency", value_name = "CCY", default_values_t = ["EUR".to_string(), "GBP".to_string(), "JPY".to_string()])]
    pub currencies: Vec<String>,

    /// Rate tenors in months (repeatable).
    #[arg(long = "tenor", value_name = "MONTHS", default_values_t = [3u32, 12, 24, 60, 120, 360])]
    pub tenors: Vec<u32>,

    /// Probability of dropping a business day from a series.
    #[arg(long, default_value_t = 0.02)]
    pub drop_prob: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_window_options() {
        let cli = Cli::try_parse_from([
            "survey", "plot-vol", "-f", "rates.csv", "-o", "vol.svg", "--return-days", "5", "-c", "EUR", "-c", "GBP",
        ])
        .unwrap();
        let Command::PlotVol(args) = cli.command else {
            panic!("expected plot-vol");
        };
        assert_eq!(args.return_days, 5);
        assert_eq!(args.window, 26);
        assert_eq!(args.chart.currencies, vec!["EUR", "GBP"]);
        assert_eq!(args.chart.input.file, Some(PathBuf::from("rates.csv")));
    }

    #[test]
    fn matrix_printout_is_a_correlation_option() {
        let cli = Cli::try_parse_from(["survey", "plot-corr", "-o", "corr.svg", "--print-matrix", "--window", "10"]).unwrap();
        let Command::PlotCorr(args) = cli.command else {
            panic!("expected plot-corr");
        };
        assert!(args.print_matrix);
        assert_eq!(args.window.window, 10);

        assert!(Cli::try_parse_from(["survey", "plot-vol", "-o", "vol.svg", "--print-matrix"]).is_err());
    }

    #[test]
    fn verbosity_counts_and_is_global() {
        let cli = Cli::try_parse_from(["survey", "values", "-f", "a.csv", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::try_parse_from(["survey", "sample", "-o", "out.csv"]).unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.currencies, vec!["EUR", "GBP", "JPY"]);
        assert_eq!(args.tenors, vec![3, 12, 24, 60, 120, 360]);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }
}
