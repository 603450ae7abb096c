//! Daily and cumulative returns for the gated strategy and its baselines.
//!
//! Three variants share one pct-change backbone:
//! - signal-gated: the day's return when the executed signal is long, else 0
//! - buy-and-hold: the plain day-over-day return
//! - entry-anchored: buy-and-hold exposure starting at the signal's first
//!   entry and held forever after
//!
//! The cumulative curve is the running product of (1 + daily), seeded at 1.0.
//! An undefined daily return leaves a hole in the curve at that index but
//! does not poison later values: the running product continues past it.

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which strategy a returns series describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnsKind {
    SignalGated,
    BuyAndHold,
    EntryAnchored,
}

impl ReturnsKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReturnsKind::SignalGated => "signal-gated",
            ReturnsKind::BuyAndHold => "buy-and-hold",
            ReturnsKind::EntryAnchored => "entry-anchored",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReturnsError {
    #[error("need at least 2 observations to compute returns, got {len}")]
    InsufficientData { len: usize },
}

/// Daily returns and the cumulative growth curve for one strategy variant,
/// index-aligned with the price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnsSeries {
    pub kind: ReturnsKind,
    pub daily: Vec<Option<f64>>,
    pub cumulative: Vec<Option<f64>>,
}

impl ReturnsSeries {
    /// Day's return when the executed signal is long, 0 otherwise.
    ///
    /// Index 0 is a defined 0.0: with no prior signal the strategy holds
    /// cash, which is a known outcome, not a missing one.
    pub fn signal_gated(
        series: &PriceSeries,
        signal: &[Option<bool>],
    ) -> Result<Self, ReturnsError> {
        assert_eq!(
            signal.len(),
            series.len(),
            "signal must be index-aligned with the price series"
        );
        check_length(series)?;

        let base = pct_change(&series.closes());
        let mut daily = vec![Some(0.0); series.len()];
        for t in 1..series.len() {
            if signal[t] == Some(true) {
                daily[t] = base[t];
            }
        }

        Ok(Self::from_daily(ReturnsKind::SignalGated, daily))
    }

    /// Plain day-over-day return; undefined at index 0.
    pub fn buy_and_hold(series: &PriceSeries) -> Result<Self, ReturnsError> {
        check_length(series)?;
        let daily = pct_change(&series.closes());
        Ok(Self::from_daily(ReturnsKind::BuyAndHold, daily))
    }

    /// Buy-and-hold exposure anchored at the signal's first entry.
    ///
    /// Exposure is 0 strictly before the first `+1` position and 1 from that
    /// index onward, never re-flattening. When the signal never enters, the
    /// exposure stays 0 for the whole series.
    pub fn entry_anchored(
        series: &PriceSeries,
        position: &[Option<i8>],
    ) -> Result<Self, ReturnsError> {
        assert_eq!(
            position.len(),
            series.len(),
            "position must be index-aligned with the price series"
        );
        check_length(series)?;

        let base = pct_change(&series.closes());
        let entry = position.iter().position(|p| *p == Some(1));

        let mut daily = vec![None; series.len()];
        for t in 1..series.len() {
            let exposed = entry.is_some_and(|e| t >= e);
            daily[t] = base[t].map(|r| if exposed { r } else { 0.0 });
        }

        Ok(Self::from_daily(ReturnsKind::EntryAnchored, daily))
    }

    fn from_daily(kind: ReturnsKind, daily: Vec<Option<f64>>) -> Self {
        let cumulative = cumulative_growth(&daily);
        Self {
            kind,
            daily,
            cumulative,
        }
    }

    pub fn len(&self) -> usize {
        self.daily.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Defined daily observations, in order.
    pub fn defined_daily(&self) -> Vec<f64> {
        self.daily.iter().filter_map(|v| *v).collect()
    }

    /// Number of defined daily observations.
    pub fn defined_count(&self) -> usize {
        self.daily.iter().filter(|v| v.is_some()).count()
    }

    /// Last defined value of the cumulative curve.
    pub fn final_cumulative(&self) -> Option<f64> {
        self.cumulative.iter().rev().find_map(|v| *v)
    }
}

/// Day-over-day percentage change; undefined at index 0.
fn pct_change(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    for t in 1..closes.len() {
        out[t] = Some(closes[t] / closes[t - 1] - 1.0);
    }
    out
}

/// Running product of (1 + r) over defined entries, starting from 1.0.
/// Holes stay holes; the accumulator is untouched at a hole.
fn cumulative_growth(daily: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut acc = 1.0;
    let mut out = Vec::with_capacity(daily.len());
    for d in daily {
        match d {
            Some(r) => {
                acc *= 1.0 + r;
                out.push(Some(acc));
            }
            None => out.push(None),
        }
    }
    out
}

fn check_length(series: &PriceSeries) -> Result<(), ReturnsError> {
    if series.len() < 2 {
        return Err(ReturnsError::InsufficientData { len: series.len() });
    }
    Ok(())
}
