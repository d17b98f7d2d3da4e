//! Export summaries (CSV/JSON) and rendered charts (SVG).
//!
//! CSV exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per series, NaN written as an empty cell.

use std::fs::{self, File};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{CoverageReport, Dataset, ValueSummary};
use crate::error::AppError;

/// Write the value summary (one row per series) to a CSV file.
pub fn write_value_summary_csv(path: &Path, summary: &ValueSummary) -> Result<(), AppError> {
    let mut writer = create_csv(path)?;
    writer
        .write_record(["CURRENCY", "MONTHS", "TERM", "ASSET", "count", "mean", "std", "min", "25%", "50%", "75%", "max"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in &summary.rows {
        let s = &r.stats;
        writer
            .write_record([
                r.currency.clone(),
                r.months.to_string(),
                r.term.clone(),
                r.asset.display_name().to_string(),
                s.count.to_string(),
                fmt_cell(s.mean),
                fmt_cell(s.std),
                fmt_cell(s.min),
                fmt_cell(s.q25),
                fmt_cell(s.q50),
                fmt_cell(s.q75),
                fmt_cell(s.max),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    finish_csv(writer, path)
}

/// Write the coverage report to a CSV file.
pub fn write_coverage_csv(path: &Path, report: &CoverageReport) -> Result<(), AppError> {
    let mut writer = create_csv(path)?;
    writer
        .write_record(["CURRENCY", "TERM", "MONTHS", "MIN", "MAX", "GAP", "FILL"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in &report.rows {
        writer
            .write_record([
                r.currency.clone(),
                r.term.clone(),
                r.months.to_string(),
                r.min.to_string(),
                r.max.to_string(),
                r.gap.to_string(),
                fmt_cell(r.fill),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    finish_csv(writer, path)
}

/// Write observations in the ingest layout (`DATE,CURRENCY,TERM,MONTHS,VALUE,ASSET`).
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = create_csv(path)?;
    writer
        .write_record(["DATE", "CURRENCY", "TERM", "MONTHS", "VALUE", "ASSET"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for o in dataset.iter() {
        writer
            .write_record([
                o.date.to_string(),
                o.currency.clone(),
                o.term.clone(),
                o.months.to_string(),
                fmt_cell(o.value),
                o.asset.display_name().to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    finish_csv(writer, path)
}

/// Write any report as pretty JSON.
///
/// NaN is not representable in JSON; `serde_json` writes it as `null`.
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON '{}': {e}", path.display())))?;
    info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

/// Write a rendered SVG document.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), AppError> {
    fs::write(path, svg)
        .map_err(|e| AppError::new(2, format!("Failed to write SVG '{}': {e}", path.display())))?;
    info!(path = %path.display(), bytes = svg.len(), "wrote chart");
    Ok(())
}

fn create_csv(path: &Path) -> Result<csv::Writer<File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn finish_csv(mut writer: csv::Writer<File>, path: &Path) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    info!(path = %path.display(), "wrote CSV export");
    Ok(())
}

pub(crate) fn fmt_cell(v: f64) -> String {
    if v.is_finite() { format!("{v}") } else { String::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{AssetClass, CoverageRow, ValueStats, ValueSummaryRow};

    fn single_observation_summary() -> ValueSummary {
        ValueSummary {
            rows: vec![ValueSummaryRow {
                currency: "EUR".to_string(),
                months: 12,
                term: "1Y".to_string(),
                asset: AssetClass::Rate,
                stats: ValueStats {
                    count: 1,
                    mean: 0.03,
                    std: f64::NAN,
                    min: 0.03,
                    q25: 0.03,
                    q50: 0.03,
                    q75: 0.03,
                    max: 0.03,
                },
            }],
        }
    }

    #[test]
    fn value_summary_csv_leaves_undefined_std_empty() {
        let path = std::env::temp_dir().join(format!("rates_survey_values_{}.csv", std::process::id()));
        write_value_summary_csv(&path, &single_observation_summary()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("CURRENCY,MONTHS,TERM,ASSET,count,mean,std,min,25%,50%,75%,max"));
        assert_eq!(lines.next(), Some("EUR,12,1Y,rate,1,0.03,,0.03,0.03,0.03,0.03,0.03"));
    }

    #[test]
    fn report_json_writes_undefined_std_as_null() {
        let path = std::env::temp_dir().join(format!("rates_survey_values_{}.json", std::process::id()));
        write_report_json(&path, &single_observation_summary()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let row = &json["rows"][0];
        assert!(row["std"].is_null());
        assert_eq!(row["count"], 1);
        assert_eq!(row["25%"], 0.03);
        assert_eq!(row["asset"], "rate");
    }

    #[test]
    fn coverage_csv_layout() {
        let path = std::env::temp_dir().join(format!("rates_survey_cov_{}.csv", std::process::id()));
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let report = CoverageReport {
            rows: vec![CoverageRow {
                currency: "EUR".to_string(),
                term: "1Y".to_string(),
                months: 12,
                min: d(1),
                max: d(11),
                gap: 2,
                fill: 0.8,
            }],
        };

        write_coverage_csv(&path, &report).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("CURRENCY,TERM,MONTHS,MIN,MAX,GAP,FILL"));
        assert_eq!(lines.next(), Some("EUR,1Y,12,2024-01-01,2024-01-11,2,0.8"));
    }

    #[test]
    fn dataset_csv_reads_back() {
        let path = std::env::temp_dir().join(format!("rates_survey_ds_{}.csv", std::process::id()));
        let csv = "DATE,CURRENCY,TERM,MONTHS,VALUE\n2024-01-02,EUR,FX,0,1.095\n2024-01-02,EUR,1Y,12,\n";
        let ds = crate::io::read_dataset(csv.as_bytes()).unwrap();

        write_dataset_csv(&path, &ds).unwrap();
        let back = crate::io::load_dataset(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(back.len(), 2);
        assert_eq!(back.observations[0].value, 1.095);
        assert!(back.observations[1].value.is_nan());
        assert_eq!(back.observations[1].asset, crate::domain::AssetClass::Rate);
    }

    #[test]
    fn nan_cells_are_empty() {
        assert_eq!(fmt_cell(f64::NAN), "");
        assert_eq!(fmt_cell(0.25), "0.25");
    }
}
