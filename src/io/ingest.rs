//! CSV ingest.
//!
//! Turns an observation CSV into a [`Dataset`]:
//!
//! - **Strict schema**: `DATE`, `CURRENCY`, `TERM`, `MONTHS`, `VALUE` (case-sensitive),
//!   optional `ASSET` (`fx` / `rate`)
//! - **Fail fast**: the first unparsable row aborts the load with its line number
//! - **No reshaping**: rows keep file order; grouping happens in `summary`

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{AssetClass, Dataset, Observation};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 5] = ["DATE", "CURRENCY", "TERM", "MONTHS", "VALUE"];

/// Load an observation CSV from disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let dataset = read_dataset(file)?;

    info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Parse observations from any CSV reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }
    let has_asset = header_map.contains_key("ASSET");
    debug!(has_asset, "CSV schema validated");

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        let obs = parse_row(&record, &header_map, has_asset)
            .map_err(|msg| AppError::new(2, format!("Line {line}: {msg}")))?;
        observations.push(obs);
    }

    if observations.is_empty() {
        return Err(AppError::new(3, "CSV contains no observations."));
    }

    Ok(Dataset::new(observations))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM;
    // without stripping it `DATE` would be reported missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>, has_asset: bool) -> Result<Observation, String> {
    let date = parse_date(get_required(record, header_map, "DATE")?)?;
    let currency = get_required(record, header_map, "CURRENCY")?.to_string();
    let term = get_required(record, header_map, "TERM")?.to_string();
    let months = parse_months(get_required(record, header_map, "MONTHS")?)?;
    let value = parse_value(get_optional(record, header_map, "VALUE"))?;

    let asset = match get_optional(record, header_map, "ASSET").filter(|_| has_asset) {
        Some(s) => AssetClass::parse(s).ok_or_else(|| format!("Invalid `ASSET` '{s}'. Expected `fx` or `rate`."))?,
        None => AssetClass::from_months(months),
    };

    Ok(Observation {
        date,
        currency,
        term,
        months,
        value,
        asset,
    })
}

fn get_required<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).filter(|s| !s.is_empty())
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates are preferred, but rate exports commonly use day-first formats.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // Timestamps such as `2024-01-31 00:00:00` keep their date part.
    if let Some((day, _)) = s.split_once([' ', 'T']) {
        if let Ok(d) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid `DATE` '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_months(s: &str) -> Result<u32, String> {
    if let Ok(m) = s.parse::<u32>() {
        return Ok(m);
    }
    // Integral floats (`12.0`) are common when the column went through a dataframe.
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(format!("Invalid `MONTHS` '{s}'. Expected a non-negative whole number.")),
    }
}

fn parse_value(s: Option<&str>) -> Result<f64, String> {
    let Some(s) = s else { return Ok(f64::NAN) };
    if s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .map_err(|_| format!("Invalid `VALUE` '{s}'. Expected a number."))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}DATE,CURRENCY,TERM,MONTHS,VALUE\n\
        2024-01-02,EUR,FX,0,1.0950\n\
        2024-01-02,EUR,1Y6M,18,0.0321\n\
        03/01/2024,EUR,1Y6M,18.0,\n";

    #[test]
    fn reads_rows_in_file_order() {
        let ds = read_dataset(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.observations[0];
        assert_eq!(first.currency, "EUR");
        assert_eq!(first.asset, AssetClass::Fx);
        assert_eq!(ds.observations[1].asset, AssetClass::Rate);
        assert_eq!(ds.observations[2].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(ds.observations[2].months, 18);
        assert!(ds.observations[2].value.is_nan());
    }

    #[test]
    fn explicit_asset_column_wins() {
        let csv = "DATE,CURRENCY,TERM,MONTHS,VALUE,ASSET\n2024-01-02,XAU,SPOT,0,2050.5,rate\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.observations[0].asset, AssetClass::Rate);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "DATE,CURRENCY,TERM,VALUE\n2024-01-02,EUR,1Y,0.03\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`MONTHS`"));
    }

    #[test]
    fn headers_are_case_sensitive() {
        let csv = "date,currency,term,months,value\n2024-01-02,EUR,1Y,12,0.03\n";
        assert!(read_dataset(csv.as_bytes()).is_err());
    }

    #[test]
    fn non_numeric_value_fails_with_line() {
        let csv = "DATE,CURRENCY,TERM,MONTHS,VALUE\n2024-01-02,EUR,1Y,12,0.03\n2024-01-03,EUR,1Y,12,abc\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Line 3:"), "{err}");
    }

    #[test]
    fn empty_file_is_a_data_error() {
        let csv = "DATE,CURRENCY,TERM,MONTHS,VALUE\n";
        assert_eq!(read_dataset(csv.as_bytes()).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for s in ["2024-02-29", "29/02/2024", "29-02-2024", "2024/02/29", "2024-02-29 00:00:00"] {
            assert_eq!(parse_date(s).unwrap(), expected, "{s}");
        }
        assert!(parse_date("Feb 29").is_err());
    }

    #[test]
    fn months_accepts_integral_floats_only() {
        assert_eq!(parse_months("6").unwrap(), 6);
        assert_eq!(parse_months("120.0").unwrap(), 120);
        assert!(parse_months("1.5").is_err());
        assert!(parse_months("-3").is_err());
    }
}
