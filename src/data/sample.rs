//! Synthetic rate/FX dataset generation.
//!
//! Each currency gets one FX series (log random walk, `MONTHS = 0`) and one
//! rate series per configured tenor (arithmetic random walk in decimal units).
//! Rate shocks share a per-currency level factor so the correlation charts have
//! something to show. Observations fall on business days only; `drop_prob`
//! removes random days to exercise the coverage statistics.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

use crate::chart::term_from_months;
use crate::domain::{AssetClass, Dataset, Observation, SampleConfig};
use crate::error::AppError;

/// Daily log-volatility of FX spot.
const FX_DAILY_VOL: f64 = 0.006;
/// Daily volatility of rates in decimal units (5bp).
const RATE_DAILY_VOL: f64 = 0.0005;
/// Weight of the shared level factor in each rate shock.
const LEVEL_LOADING: f64 = 0.8;

pub fn generate_sample(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.days == 0 {
        return Err(AppError::new(2, "Sample days must be > 0."));
    }
    if config.currencies.is_empty() {
        return Err(AppError::new(2, "At least one currency is required."));
    }
    if !(0.0..1.0).contains(&config.drop_prob) {
        return Err(AppError::new(2, "Drop probability must be in [0, 1)."));
    }
    if config.tenors.contains(&0) {
        return Err(AppError::new(2, "Rate tenors must be > 0 months (0 is the FX series)."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let dates = business_days(config.start, config.days);
    if dates.is_empty() {
        return Err(AppError::new(2, "Sample window contains no business days."));
    }

    let mut walks: Vec<Walk> = Vec::new();
    for currency in &config.currencies {
        walks.push(Walk {
            currency: currency.clone(),
            term: "FX".to_string(),
            months: 0,
            asset: AssetClass::Fx,
            level: rng.gen_range(0.6..1.6),
        });
        for &months in &config.tenors {
            walks.push(Walk {
                currency: currency.clone(),
                term: term_from_months(months),
                months,
                asset: AssetClass::Rate,
                level: initial_rate(months) + rng.gen_range(-0.005..0.005),
            });
        }
    }

    let idio_loading = (1.0 - LEVEL_LOADING * LEVEL_LOADING).sqrt();
    let mut observations = Vec::with_capacity(dates.len() * walks.len());

    for (day_idx, &date) in dates.iter().enumerate() {
        // One level shock per currency per day.
        let level_shocks: Vec<f64> = config.currencies.iter().map(|_| normal.sample(&mut rng)).collect();

        for walk in walks.iter_mut() {
            if day_idx > 0 {
                match walk.asset {
                    AssetClass::Fx => {
                        let z: f64 = normal.sample(&mut rng);
                        walk.level *= (FX_DAILY_VOL * z - 0.5 * FX_DAILY_VOL * FX_DAILY_VOL).exp();
                    }
                    AssetClass::Rate => {
                        let ccy_idx = config
                            .currencies
                            .iter()
                            .position(|c| *c == walk.currency)
                            .unwrap_or(0);
                        let z = LEVEL_LOADING * level_shocks[ccy_idx] + idio_loading * normal.sample(&mut rng);
                        walk.level += RATE_DAILY_VOL * z;
                    }
                }
            }

            // The first and last business days are always kept so every series spans the window.
            let anchor = day_idx == 0 || day_idx + 1 == dates.len();
            if !anchor && rng.gen_bool(config.drop_prob) {
                continue;
            }

            observations.push(Observation {
                date,
                currency: walk.currency.clone(),
                term: walk.term.clone(),
                months: walk.months,
                value: walk.level,
                asset: walk.asset,
            });
        }
    }

    debug!(
        series = walks.len(),
        business_days = dates.len(),
        rows = observations.len(),
        "generated synthetic sample"
    );
    Ok(Dataset::new(observations))
}

struct Walk {
    currency: String,
    term: String,
    months: u32,
    asset: AssetClass,
    level: f64,
}

/// Upward sloping starting curve: ~2% at the short end towards ~3.5% at 30y.
fn initial_rate(months: u32) -> f64 {
    0.02 + 0.015 * (1.0 - (-f64::from(months) / 60.0).exp())
}

fn business_days(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.seed.hash(&mut hasher);
    config.start.hash(&mut hasher);
    config.days.hash(&mut hasher);
    config.currencies.hash(&mut hasher);
    config.tenors.hash(&mut hasher);
    config.drop_prob.to_bits().hash(&mut hasher);
    hasher.finish()
}
