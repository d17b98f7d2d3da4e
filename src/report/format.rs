//! Formatted terminal output for summaries.
//!
//! We keep formatting code in one place so:
//! - the summary/analytics code stays clean and testable
//! - output changes are localized

use crate::analytics::CorrelationMatrix;
use crate::domain::{AssetClass, ColumnLabel, CoverageReport, Dataset, ValueSummary};

/// One-paragraph overview of a loaded dataset.
pub fn format_dataset_header(dataset: &Dataset, source: &str) -> String {
    let mut out = String::new();
    out.push_str("=== survey - rate/FX dataset ===\n");
    out.push_str(&format!("Source: {source}\n"));
    match dataset.date_range() {
        Some((lo, hi)) => out.push_str(&format!("Rows: {} | dates=[{lo}, {hi}]\n", dataset.len())),
        None => out.push_str("Rows: 0\n"),
    }
    out
}

/// Value statistics table (one row per series).
pub fn format_value_summary(summary: &ValueSummary) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<6} {:>6} {:<8} {:<5} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            "ccy", "months", "term", "asset", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&rule(&[6, 6, 8, 5, 6, 12, 12, 12, 12, 12, 12, 12]));

    for r in &summary.rows {
        let s = &r.stats;
        out.push_str(
            format!(
                "{:<6} {:>6} {:<8} {:<5} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
                truncate(&r.currency, 6),
                r.months,
                truncate(&r.term, 8),
                r.asset.display_name(),
                s.count,
                fmt_num(s.mean, r.asset),
                fmt_num(s.std, r.asset),
                fmt_num(s.min, r.asset),
                fmt_num(s.q25, r.asset),
                fmt_num(s.q50, r.asset),
                fmt_num(s.q75, r.asset),
                fmt_num(s.max, r.asset),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Coverage table (span, gap, fill per series).
pub fn format_coverage(report: &CoverageReport) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<6} {:<8} {:>6} {:<10} {:<10} {:>6} {:>8}\n",
            "ccy", "term", "months", "min", "max", "gap", "fill"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&rule(&[6, 8, 6, 10, 10, 6, 8]));

    for r in &report.rows {
        out.push_str(
            format!(
                "{:<6} {:<8} {:>6} {:<10} {:<10} {:>6} {:>7.2}%\n",
                truncate(&r.currency, 6),
                truncate(&r.term, 8),
                r.months,
                r.min,
                r.max,
                r.gap,
                r.fill * 100.0,
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Full-period correlation matrix in percent.
pub fn format_correlation_matrix(corr: &CorrelationMatrix) -> String {
    let labels: Vec<String> = corr.keys.iter().map(|k| truncate(&k.label(), 12)).collect();

    let mut out = String::new();
    out.push_str(&format!("{:<12}", ""));
    for l in &labels {
        out.push_str(&format!(" {l:>12}"));
    }
    out.push('\n');

    for (i, l) in labels.iter().enumerate() {
        out.push_str(&format!("{l:<12}"));
        for j in 0..labels.len() {
            let v = corr.matrix[(i, j)];
            if v.is_finite() {
                out.push_str(&format!(" {:>11.1}%", v * 100.0));
            } else {
                out.push_str(&format!(" {:>12}", "-"));
            }
        }
        out.push('\n');
    }
    out
}

fn rule(widths: &[usize]) -> String {
    let parts: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    format!("{}\n", parts.join(" "))
}

/// FX levels read best with 4 decimals; rates as a percentage.
fn fmt_num(v: f64, asset: AssetClass) -> String {
    if !v.is_finite() {
        return "NaN".to_string();
    }
    match asset {
        AssetClass::Fx => format!("{v:.4}"),
        AssetClass::Rate => format!("{:.3}%", v * 100.0),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{CoverageRow, ValueStats, ValueSummaryRow};

    #[test]
    fn value_summary_shows_undefined_std() {
        let summary = ValueSummary {
            rows: vec![ValueSummaryRow {
                currency: "EUR".to_string(),
                months: 12,
                term: "1Y".to_string(),
                asset: AssetClass::Rate,
                stats: ValueStats {
                    count: 1,
                    mean: 0.031,
                    std: f64::NAN,
                    min: 0.031,
                    q25: 0.031,
                    q50: 0.031,
                    q75: 0.031,
                    max: 0.031,
                },
            }],
        };
        let text = format_value_summary(&summary);
        let row = text.lines().nth(2).unwrap();
        assert!(row.starts_with("EUR"));
        assert!(row.contains("3.100%"));
        assert!(row.contains("NaN"));
    }

    #[test]
    fn coverage_fill_is_a_percentage() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let report = CoverageReport {
            rows: vec![CoverageRow {
                currency: "USD".to_string(),
                term: "FX".to_string(),
                months: 0,
                min: d(1),
                max: d(21),
                gap: 1,
                fill: 0.95,
            }],
        };
        let text = format_coverage(&report);
        assert!(text.lines().nth(2).unwrap().ends_with("95.00%"));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("EUR", 6), "EUR");
        assert_eq!(truncate("EURIBOR6M", 6), "EURIB.");
    }
}
