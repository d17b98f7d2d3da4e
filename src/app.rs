//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - resolves the input CSV (flag, `SURVEY_DATA`, or picker)
//! - runs summaries / chart preparation
//! - prints tables and writes exports

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::chart::Chart;
use crate::cli::{Cli, Command, InputArgs, PlotCorrArgs, PlotDataArgs, PlotWindowArgs, SampleArgs, SummaryArgs};
use crate::domain::ChartConfig;
use crate::error::AppError;

pub mod pipeline;

const SUBCOMMANDS: [&str; 7] = ["values", "dates", "plot-data", "plot-vol", "plot-corr", "sample", "tui"];

/// Entry point for the `survey` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; SURVEY_DATA may come from the real environment or not at all.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Values(args) => handle_values(args),
        Command::Dates(args) => handle_dates(args),
        Command::PlotData(args) => handle_plot_data(args),
        Command::PlotVol(args) => handle_plot_vol(args),
        Command::PlotCorr(args) => handle_plot_corr(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// Logs go to stderr so stdout stays clean for tables.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rates_survey={default_level}")));

    // `try_init` so a second call (tests, embedding) is a no-op instead of a panic.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn input_path(input: &InputArgs) -> Result<PathBuf, AppError> {
    crate::cli::picker::resolve_csv_path(input.file.as_deref())
}

fn handle_values(args: SummaryArgs) -> Result<(), AppError> {
    let path = input_path(&args.input)?;
    let dataset = pipeline::load(&path)?;
    let summary = crate::summary::describe_values(&dataset)?;

    println!("{}", crate::report::format_dataset_header(&dataset, &path.display().to_string()));
    println!("{}", crate::report::format_value_summary(&summary));

    if let Some(out) = &args.export {
        crate::io::write_value_summary_csv(out, &summary)?;
    }
    if let Some(out) = &args.json {
        crate::io::write_report_json(out, &summary)?;
    }
    Ok(())
}

fn handle_dates(args: SummaryArgs) -> Result<(), AppError> {
    let path = input_path(&args.input)?;
    let dataset = pipeline::load(&path)?;
    let report = crate::summary::describe_dates(&dataset)?;

    println!("{}", crate::report::format_dataset_header(&dataset, &path.display().to_string()));
    println!("{}", crate::report::format_coverage(&report));

    if let Some(out) = &args.export {
        crate::io::write_coverage_csv(out, &report)?;
    }
    if let Some(out) = &args.json {
        crate::io::write_report_json(out, &report)?;
    }
    Ok(())
}

fn handle_plot_data(args: PlotDataArgs) -> Result<(), AppError> {
    let config = pipeline::chart_config_from_args(&args.chart);
    let dataset = pipeline::load(&input_path(&args.chart.input)?)?;
    let chart = pipeline::data_chart(&dataset, &config)?;
    write_chart(&args.chart.output, chart.into(), &config)
}

fn handle_plot_vol(args: PlotWindowArgs) -> Result<(), AppError> {
    let config = pipeline::window_config_from_args(&args);
    let dataset = pipeline::load(&input_path(&args.chart.input)?)?;
    let chart = pipeline::volatility_chart(&dataset, &config)?;
    write_chart(&args.chart.output, chart.into(), &config)
}

fn handle_plot_corr(args: PlotCorrArgs) -> Result<(), AppError> {
    let config = pipeline::window_config_from_args(&args.window);
    let dataset = pipeline::load(&input_path(&args.window.chart.input)?)?;
    let (chart, matrix) = pipeline::correlation_chart(&dataset, &config)?;

    if args.print_matrix {
        println!("{}", crate::report::format_correlation_matrix(&matrix));
    }
    write_chart(&args.window.chart.output, chart.into(), &config)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = pipeline::sample_config_from_args(&args);
    let dataset = crate::data::generate_sample(&config)?;
    crate::io::write_dataset_csv(&args.output, &dataset)?;

    info!(rows = dataset.len(), path = %args.output.display(), "wrote synthetic sample");
    println!("Wrote {} observations to {}", dataset.len(), args.output.display());
    Ok(())
}

fn handle_tui(args: InputArgs) -> Result<(), AppError> {
    let path = input_path(&args)?;
    let dataset = pipeline::load(&path)?;
    crate::tui::run(dataset, &path)
}

fn write_chart(output: &Path, chart: Chart, config: &ChartConfig) -> Result<(), AppError> {
    debug!(width = config.width, height = config.height, "rendering SVG");
    let svg = chart.to_svg(config.width, config.height)?;
    crate::io::write_svg(output, &svg)?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Rewrite argv so `survey` defaults to `survey tui`.
///
/// Rules:
/// - `survey`                       -> `survey tui`
/// - `survey -f rates.csv ...`      -> `survey tui -f rates.csv ...`
/// - `survey -v dates ...`          -> unchanged (`-v` is global)
/// - `survey --help/--version/-h`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    // Verbosity flags may precede the subcommand; look past them.
    let first = argv
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, arg)| !is_verbosity_flag(arg))
        .map(|(idx, arg)| (idx, arg.clone()));

    let Some((idx, arg)) = first else {
        argv.push("tui".to_string());
        return argv;
    };

    if matches!(arg.as_str(), "-h" | "--help" | "-V" | "--version" | "help") {
        return argv;
    }
    if SUBCOMMANDS.contains(&arg.as_str()) {
        return argv;
    }

    // Any other leading flag belongs to the default subcommand.
    if arg.starts_with('-') {
        argv.insert(idx, "tui".to_string());
    }
    argv
}

fn is_verbosity_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}
