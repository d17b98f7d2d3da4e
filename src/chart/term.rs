//! Human tenor labels.

/// Format a tenor given in (fractional) years as `<Y>Y<M>M`.
///
/// The tenor is rounded to whole months first; zero segments are omitted, so a
/// zero tenor (FX) yields an empty string.
pub fn normalised_term(years: f64) -> String {
    let months = (years * 12.0).round() as i64;
    let (y, m) = (months / 12, months % 12);

    let mut out = String::new();
    if y != 0 {
        out.push_str(&format!("{y}Y"));
    }
    if m != 0 {
        out.push_str(&format!("{m}M"));
    }
    out
}

/// Label for a tenor held in whole months.
pub fn term_from_months(months: u32) -> String {
    normalised_term(f64::from(months) / 12.0)
}
