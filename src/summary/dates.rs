//! Date coverage per series: span, largest gap, fill ratio.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{CoverageReport, CoverageRow, Dataset, Observation};
use crate::error::SurveyError;

/// Observations of one (currency, term) pair, in file order.
#[derive(Debug, Clone)]
pub struct SeriesGroup<'a> {
    pub currency: &'a str,
    pub term: &'a str,
    pub observations: Vec<&'a Observation>,
}

/// Group observations by (currency, term).
///
/// Order is deterministic: currencies in first-seen order, then terms in
/// first-seen order within each currency.
pub fn group_series(dataset: &Dataset) -> Vec<SeriesGroup<'_>> {
    let mut currencies: Vec<(&str, Vec<SeriesGroup<'_>>)> = Vec::new();
    let mut currency_idx: HashMap<&str, usize> = HashMap::new();
    let mut term_idx: HashMap<(&str, &str), usize> = HashMap::new();

    for obs in dataset.iter() {
        let c = *currency_idx.entry(obs.currency.as_str()).or_insert_with(|| {
            currencies.push((obs.currency.as_str(), Vec::new()));
            currencies.len() - 1
        });
        let terms = &mut currencies[c].1;
        let t = *term_idx
            .entry((obs.currency.as_str(), obs.term.as_str()))
            .or_insert_with(|| {
                terms.push(SeriesGroup {
                    currency: obs.currency.as_str(),
                    term: obs.term.as_str(),
                    observations: Vec::new(),
                });
                terms.len() - 1
            });
        terms[t].observations.push(obs);
    }

    currencies.into_iter().flat_map(|(_, terms)| terms).collect()
}

/// Coverage statistics for every (currency, term) series.
///
/// For a series sorted by date with steps `Δ_i` (days between consecutive
/// observations):
///
/// - `gap  = max(Δ_i - 1)`
/// - `fill = 1 - Σ(Δ_i - 1) / (last - first)`
///
/// Fails on the first series with fewer than two observations or a zero-day span.
pub fn describe_dates(dataset: &Dataset) -> Result<CoverageReport, SurveyError> {
    let groups = group_series(dataset);
    debug!(series = groups.len(), "describing date coverage");

    let mut rows = Vec::with_capacity(groups.len());
    for group in groups {
        rows.push(coverage_row(&group)?);
    }
    Ok(CoverageReport { rows })
}

fn coverage_row(group: &SeriesGroup<'_>) -> Result<CoverageRow, SurveyError> {
    let count = group.observations.len();
    let (Some(first_row), true) = (group.observations.first(), count >= 2) else {
        return Err(SurveyError::InsufficientObservations {
            currency: group.currency.to_string(),
            term: group.term.to_string(),
            count,
        });
    };

    let mut dates: Vec<_> = group.observations.iter().map(|o| o.date).collect();
    dates.sort();

    let min = dates[0];
    let max = dates[dates.len() - 1];
    let span = (max - min).num_days();
    if span == 0 {
        return Err(SurveyError::ZeroSpan {
            currency: group.currency.to_string(),
            term: group.term.to_string(),
            date: min,
        });
    }

    let steps = dates.windows(2).map(|w| (w[1] - w[0]).num_days() - 1);
    let (gap, missing) = steps.fold((i64::MIN, 0i64), |(gap, sum), s| (gap.max(s), sum + s));

    Ok(CoverageRow {
        currency: group.currency.to_string(),
        term: group.term.to_string(),
        months: first_row.months,
        min,
        max,
        gap,
        fill: 1.0 - missing as f64 / span as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use crate::domain::AssetClass;

    fn obs(date: NaiveDate, currency: &str, term: &str, months: u32) -> Observation {
        Observation {
            date,
            currency: currency.to_string(),
            term: term.to_string(),
            months,
            value: 1.0,
            asset: AssetClass::from_months(months),
        }
    }

    fn daily(start: NaiveDate, n: i64, currency: &str, term: &str, months: u32) -> Vec<Observation> {
        (0..n)
            .map(|i| obs(start + Duration::days(i), currency, term, months))
            .collect()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn daily_series_has_no_gap_and_full_fill() {
        let ds = Dataset::new(daily(start(), 30, "EUR", "1Y", 12));
        let report = describe_dates(&ds).unwrap();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.gap, 0);
        assert!((row.fill - 1.0).abs() < 1e-12);
        assert_eq!(row.min, start());
        assert_eq!(row.max, start() + Duration::days(29));
        assert_eq!(row.months, 12);
    }

    #[test]
    fn one_missing_day_reduces_fill_by_one_over_span() {
        let mut rows = daily(start(), 21, "EUR", "1Y", 12);
        rows.remove(10);
        let ds = Dataset::new(rows);
        let row = &describe_dates(&ds).unwrap().rows[0];
        let span = 20.0;
        assert_eq!(row.gap, 1);
        assert!((row.fill - (1.0 - 1.0 / span)).abs() < 1e-12);
    }

    #[test]
    fn largest_gap_and_total_missing() {
        let d = |i| start() + Duration::days(i);
        let ds = Dataset::new(vec![
            obs(d(0), "USD", "FX", 0),
            obs(d(3), "USD", "FX", 0),
            obs(d(4), "USD", "FX", 0),
            obs(d(10), "USD", "FX", 0),
        ]);
        let row = &describe_dates(&ds).unwrap().rows[0];
        // Steps: 3, 1, 6 -> missing 2, 0, 5.
        assert_eq!(row.gap, 5);
        assert!((row.fill - (1.0 - 7.0 / 10.0)).abs() < 1e-12);
    }

    #[test]
    fn unsorted_input_is_sorted_per_series() {
        let d = |i| start() + Duration::days(i);
        let ds = Dataset::new(vec![
            obs(d(2), "EUR", "1Y", 12),
            obs(d(0), "EUR", "1Y", 12),
            obs(d(1), "EUR", "1Y", 12),
        ]);
        let row = &describe_dates(&ds).unwrap().rows[0];
        assert_eq!(row.gap, 0);
        assert_eq!(row.min, d(0));
        assert_eq!(row.max, d(2));
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let d = |i| start() + Duration::days(i);
        let ds = Dataset::new(vec![
            obs(d(0), "USD", "2Y", 24),
            obs(d(0), "EUR", "1Y", 12),
            obs(d(0), "USD", "1Y", 12),
            obs(d(1), "EUR", "1Y", 12),
            obs(d(1), "USD", "1Y", 12),
            obs(d(1), "USD", "2Y", 24),
            obs(d(0), "EUR", "FX", 0),
            obs(d(1), "EUR", "FX", 0),
        ]);
        let report = describe_dates(&ds).unwrap();
        let order: Vec<(String, String)> = report
            .rows
            .iter()
            .map(|r| (r.currency.clone(), r.term.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("USD".to_string(), "2Y".to_string()),
                ("USD".to_string(), "1Y".to_string()),
                ("EUR".to_string(), "1Y".to_string()),
                ("EUR".to_string(), "FX".to_string()),
            ]
        );
    }

    #[test]
    fn single_observation_is_an_explicit_error() {
        let mut rows = daily(start(), 5, "EUR", "1Y", 12);
        rows.push(obs(start(), "GBP", "5Y", 60));
        let err = describe_dates(&Dataset::new(rows)).unwrap_err();
        assert_eq!(
            err,
            SurveyError::InsufficientObservations {
                currency: "GBP".to_string(),
                term: "5Y".to_string(),
                count: 1,
            }
        );
    }

    #[test]
    fn same_day_observations_are_a_zero_span_error() {
        let ds = Dataset::new(vec![obs(start(), "EUR", "1Y", 12), obs(start(), "EUR", "1Y", 12)]);
        assert!(matches!(describe_dates(&ds), Err(SurveyError::ZeroSpan { .. })));
    }
}
