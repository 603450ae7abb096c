//! KPI engine — pure functions that compare strategy performance.
//!
//! Every KPI is a pure function: returns series in, `Option<f64>` out.
//! `None` means "not computable" and is distinct from zero everywhere: a
//! zero-volatility Sharpe, an empty window, a curve with fewer than two
//! observations all surface as `None`, never as a silent 0.0.
//!
//! Annualization follows the 252-trading-day convention, with exponents and
//! denominators driven by the count of defined daily observations.

use crate::returns::{ReturnsKind, ReturnsSeries};
use serde::{Deserialize, Serialize};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate used by the Sharpe ratio unless overridden.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.025;

/// The KPI column for one strategy variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiBundle {
    pub kind: ReturnsKind,
    pub cagr: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub total_return_multiple: Option<f64>,
}

impl KpiBundle {
    /// Compute all KPIs from a returns series.
    pub fn compute(returns: &ReturnsSeries, risk_free_rate: f64) -> Self {
        Self {
            kind: returns.kind,
            cagr: cagr(returns),
            volatility: volatility(returns),
            sharpe: sharpe_ratio(returns, risk_free_rate),
            max_drawdown: max_drawdown(returns),
            total_return_multiple: total_return_multiple(returns),
        }
    }

    /// The all-`None` column reported when a study has too little history to
    /// compute returns at all.
    pub fn undefined(kind: ReturnsKind) -> Self {
        Self {
            kind,
            cagr: None,
            volatility: None,
            sharpe: None,
            max_drawdown: None,
            total_return_multiple: None,
        }
    }
}

// ─── Individual KPI functions ───────────────────────────────────────

/// Compound annual growth rate: final_cum ^ (252 / n) - 1.
///
/// `n` counts defined daily observations, so calendar gaps in the source do
/// not stretch the exponent.
pub fn cagr(returns: &ReturnsSeries) -> Option<f64> {
    let n = returns.defined_count();
    if n < 2 {
        return None;
    }
    let final_cum = returns.final_cumulative()?;
    Some(final_cum.powf(TRADING_DAYS_PER_YEAR / n as f64) - 1.0)
}

/// Annualized volatility: sample standard deviation of the defined daily
/// returns times sqrt(252).
pub fn volatility(returns: &ReturnsSeries) -> Option<f64> {
    let daily = returns.defined_daily();
    let std = std_dev(&daily)?;
    Some(std * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Annualized Sharpe ratio: (mean(daily) * 252 - rf) / annualized volatility.
///
/// Undefined when volatility is zero — a riskless curve has no meaningful
/// risk-adjusted ratio.
pub fn sharpe_ratio(returns: &ReturnsSeries, risk_free_rate: f64) -> Option<f64> {
    let daily = returns.defined_daily();
    if daily.len() < 2 {
        return None;
    }
    let vol = volatility(returns)?;
    if vol == 0.0 {
        return None;
    }
    let annual_mean = mean(&daily) * TRADING_DAYS_PER_YEAR;
    Some((annual_mean - risk_free_rate) / vol)
}

/// Maximum drawdown as a non-positive fraction (e.g. -0.25 = 25% drawdown).
///
/// Exactly 0.0 for a monotonically non-decreasing curve.
pub fn max_drawdown(returns: &ReturnsSeries) -> Option<f64> {
    if returns.defined_count() < 2 {
        return None;
    }

    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for v in returns.cumulative.iter().flatten() {
        if *v > peak {
            peak = *v;
        }
        let dd = v / peak - 1.0;
        if dd < worst {
            worst = dd;
        }
    }
    Some(worst)
}

/// Final value of the cumulative growth curve: 1.5 means +50% overall.
pub fn total_return_multiple(returns: &ReturnsSeries) -> Option<f64> {
    if returns.defined_count() < 2 {
        return None;
    }
    returns.final_cumulative()
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 divisor). `None` below 2 observations.
fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
