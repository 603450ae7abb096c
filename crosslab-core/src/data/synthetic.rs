//! Deterministic synthetic quote provider.
//!
//! Generates a seeded random walk over weekdays so studies, demos and tests
//! can run without network. Same seed + symbol + range: same series.

use super::provider::{DataError, DataSource, FetchResult, QuoteProvider};
use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const START_PRICE: f64 = 100.0;

/// Offline provider producing a drift-plus-noise daily walk.
pub struct SyntheticProvider {
    seed: u64,
    drift: f64,
    volatility: f64,
}

impl SyntheticProvider {
    /// Default profile: ~10% annual drift, ~19% annual volatility.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            drift: 0.0004,
            volatility: 0.012,
        }
    }

    pub fn with_profile(seed: u64, drift: f64, volatility: f64) -> Self {
        Self {
            seed,
            drift,
            volatility,
        }
    }

    /// Mix the symbol into the seed so different tickers get different walks.
    fn seed_for(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }
}

impl QuoteProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let mut rng = StdRng::seed_from_u64(self.seed_for(symbol));
        let mut price = START_PRICE;
        let mut points = Vec::new();

        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                points.push(PricePoint {
                    date,
                    adj_close: price,
                });
                let noise: f64 = rng.gen_range(-1.0..1.0);
                price *= 1.0 + self.drift + self.volatility * noise;
                // Keep the walk strictly positive.
                price = price.max(START_PRICE * 0.01);
            }
            date += Duration::days(1);
        }

        if points.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        tracing::debug!(symbol, rows = points.len(), "synthetic series generated");

        let series = PriceSeries::new(symbol, points)?;
        Ok(FetchResult {
            series,
            source: DataSource::Synthetic,
        })
    }
}
