//! Moving-average implementations.
//!
//! Both averages are free functions over an adjusted-close slice, returning
//! one `Option<f64>` per input index. `None` means the average is undefined
//! at that index; NaN is never used as a sentinel. The crossover signal
//! consumes these vectors index-aligned with the price series.

pub mod ema;
pub mod sma;

pub use ema::ema;
pub use sma::sma;

use serde::{Deserialize, Serialize};

/// Which moving-average family feeds the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Sma,
    Ema,
}

impl IndicatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
        }
    }

    /// Compute this average over `values` with the given window.
    pub fn compute(&self, values: &[f64], window: usize) -> Vec<Option<f64>> {
        match self {
            IndicatorKind::Sma => sma(values, window),
            IndicatorKind::Ema => ema(values, window),
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            other => Err(format!("unknown indicator kind: {other} (expected sma or ema)")),
        }
    }
}

/// Create a test series from close prices, one day apart.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    use crate::domain::{PricePoint, PriceSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &adj_close)| PricePoint {
            date: base_date + chrono::Duration::days(i as i64),
            adj_close,
        })
        .collect();
    PriceSeries::new("TEST", points).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert an optional value is defined and approximately equal.
#[cfg(test)]
pub fn assert_approx_opt(actual: Option<f64>, expected: f64, epsilon: f64) {
    match actual {
        Some(v) => assert_approx(v, expected, epsilon),
        None => panic!("assert_approx_opt failed: expected {expected}, got None"),
    }
}

/// Default epsilon for engine tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
