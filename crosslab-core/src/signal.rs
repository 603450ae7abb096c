//! Crossover signal — executed position from two moving averages.
//!
//! The raw comparison `short_avg > long_avg` is total over the series
//! (an undefined average compares false). The executed signal is that
//! comparison shifted forward one bar: a trade at t acts on information
//! known at t-1, so index 0 stays undefined. Position is the day-over-day
//! difference of the executed signal; +1 marks an entry, -1 an exit.

use crate::domain::PriceSeries;
use crate::indicators::IndicatorKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Window and indicator selection for one study.
///
/// `short_window < long_window` is the expected configuration but is not
/// enforced; an inverted pair simply produces an inverted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalParams {
    pub short_window: usize,
    pub long_window: usize,
    pub kind: IndicatorKind,
}

impl SignalParams {
    pub fn new(short_window: usize, long_window: usize, kind: IndicatorKind) -> Self {
        Self {
            short_window,
            long_window,
            kind,
        }
    }

    pub fn default_params() -> Self {
        Self::new(10, 50, IndicatorKind::Sma)
    }

    /// Reject non-positive windows before any computation runs.
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.short_window == 0 {
            return Err(SignalError::ZeroWindow { which: "short" });
        }
        if self.long_window == 0 {
            return Err(SignalError::ZeroWindow { which: "long" });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("{which} window must be >= 1")]
    ZeroWindow { which: &'static str },
}

/// Buy or sell transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// A signal transition, anchored to the short average for chart overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeMarker {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub anchor: f64,
}

/// Everything the signal engine derives from one price series,
/// index-aligned with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalFrame {
    pub params: SignalParams,
    pub short_avg: Vec<Option<f64>>,
    pub long_avg: Vec<Option<f64>>,
    /// Executed signal: `Some(true)` means long through day t. Undefined at 0.
    pub signal: Vec<Option<bool>>,
    /// Signal transition: +1 entry, -1 exit, 0 hold. Undefined at 0 and 1.
    pub position: Vec<Option<i8>>,
    pub markers: Vec<TradeMarker>,
}

impl SignalFrame {
    pub fn compute(series: &PriceSeries, params: &SignalParams) -> Result<Self, SignalError> {
        params.validate()?;

        let closes = series.closes();
        let n = closes.len();

        let short_avg = params.kind.compute(&closes, params.short_window);
        let long_avg = params.kind.compute(&closes, params.long_window);

        // Total raw comparison: an undefined side compares false, so a long
        // window that exceeds the whole history yields an all-false signal
        // rather than an error.
        let raw: Vec<bool> = (0..n)
            .map(|t| matches!((short_avg[t], long_avg[t]), (Some(s), Some(l)) if s > l))
            .collect();

        let mut signal: Vec<Option<bool>> = vec![None; n];
        for t in 1..n {
            signal[t] = Some(raw[t - 1]);
        }

        let mut position: Vec<Option<i8>> = vec![None; n];
        for t in 2..n {
            if let (Some(cur), Some(prev)) = (signal[t], signal[t - 1]) {
                position[t] = Some(cur as i8 - prev as i8);
            }
        }

        let points = series.points();
        let mut markers = Vec::new();
        for t in 0..n {
            let side = match position[t] {
                Some(1) => TradeSide::Buy,
                Some(-1) => TradeSide::Sell,
                _ => continue,
            };
            // The short average is always defined at a transition: both
            // averages were defined at t-1 or t-2 and definedness never
            // lapses once reached.
            if let Some(anchor) = short_avg[t] {
                markers.push(TradeMarker {
                    date: points[t].date,
                    side,
                    anchor,
                });
            }
        }

        Ok(Self {
            params: *params,
            short_avg,
            long_avg,
            signal,
            position,
            markers,
        })
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    /// Number of entries and exits over the whole series.
    pub fn transition_count(&self) -> usize {
        self.position
            .iter()
            .filter(|p| matches!(p, Some(1) | Some(-1)))
            .count()
    }

    pub fn buys(&self) -> impl Iterator<Item = &TradeMarker> {
        self.markers.iter().filter(|m| m.side == TradeSide::Buy)
    }

    pub fn sells(&self) -> impl Iterator<Item = &TradeMarker> {
        self.markers.iter().filter(|m| m.side == TradeSide::Sell)
    }
}
