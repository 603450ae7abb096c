//! Chart bundle — plotting-ready series extracted from a study result.
//!
//! Rendering is the consumer's concern: this module only lines data up the
//! way the two chart panels want it. The overlay panel shows price plus
//! both averages with buy/sell markers anchored at the short average; the
//! performance panel shows both cumulative curves on the same date axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crosslab_core::returns::ReturnsSeries;
use crosslab_core::signal::TradeMarker;

use crate::result::StudyResult;

/// Price overlay panel: adjusted close, both averages, trade markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub dates: Vec<NaiveDate>,
    pub adj_close: Vec<f64>,
    pub short_avg: Vec<Option<f64>>,
    pub long_avg: Vec<Option<f64>>,
    pub buys: Vec<TradeMarker>,
    pub sells: Vec<TradeMarker>,
}

/// Performance panel: both cumulative growth curves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSeries {
    pub dates: Vec<NaiveDate>,
    pub gated: Vec<Option<f64>>,
    pub baseline: Vec<Option<f64>>,
}

/// Everything the two panels need, index-aligned throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBundle {
    pub overlay: OverlaySeries,
    pub performance: PerformanceSeries,
}

impl ChartBundle {
    pub fn from_result(result: &StudyResult) -> Self {
        let dates = result.series.dates();
        let n = result.series.len();

        let cumulative = |returns: &Option<ReturnsSeries>| match returns {
            Some(r) => r.cumulative.clone(),
            None => vec![None; n],
        };

        Self {
            overlay: OverlaySeries {
                dates: dates.clone(),
                adj_close: result.series.closes(),
                short_avg: result.frame.short_avg.clone(),
                long_avg: result.frame.long_avg.clone(),
                buys: result.frame.buys().copied().collect(),
                sells: result.frame.sells().copied().collect(),
            },
            performance: PerformanceSeries {
                dates,
                gated: cumulative(&result.gated),
                baseline: cumulative(&result.baseline),
            },
        }
    }
}
