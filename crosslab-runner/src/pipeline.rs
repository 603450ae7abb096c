//! Study pipeline — fetch, signal, returns, and KPIs in one pass.
//!
//! `run_study()` is the single entry point: it validates the request,
//! resolves the lookback window, fetches through the given provider, and
//! derives every artifact the presentation layer needs. A provider failure
//! is a typed error returned to the caller; a series too short for return
//! math still completes the study, with every KPI reported undefined.

use thiserror::Error;
use tracing::{debug, info, warn};

use crosslab_core::data::{lookback_window, DataError, QuoteProvider};
use crosslab_core::domain::PriceSeries;
use crosslab_core::kpi::KpiBundle;
use crosslab_core::returns::{ReturnsError, ReturnsKind, ReturnsSeries};
use crosslab_core::signal::SignalFrame;

use crate::params::{BaselineMode, ParamError, StudyParams};
use crate::result::{KpiComparison, StudyResult, SCHEMA_VERSION};

/// Errors from the study pipeline.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Run one complete study through the given provider.
pub fn run_study(
    params: &StudyParams,
    provider: &dyn QuoteProvider,
) -> Result<StudyResult, StudyError> {
    params.validate()?;

    let today = chrono::Local::now().date_naive();
    let (start, end) = lookback_window(today, params.start_years_ago, params.end_years_ago);

    info!(
        symbol = %params.symbol,
        provider = provider.name(),
        %start,
        %end,
        "fetching price history"
    );
    let fetched = provider.fetch(&params.symbol, start, end)?;
    let series = fetched.series;

    // A provider returning Ok with an empty series breaks the trait
    // contract; treat it as the no-data case rather than trusting it.
    let (start_date, end_date) = match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(StudyError::Data(DataError::NoData {
                symbol: params.symbol.clone(),
            }))
        }
    };
    let bar_count = series.len();
    debug!(bars = bar_count, %start_date, %end_date, "series fetched");

    let mut warnings = Vec::new();
    if params.long_window > bar_count {
        warnings.push(format!(
            "long window {} exceeds the {} bars of history; the long average is undefined for the whole range",
            params.long_window, bar_count
        ));
    }
    if params.short_window >= params.long_window {
        warnings.push(format!(
            "short window {} is not below long window {}; the crossover signal may be degenerate",
            params.short_window, params.long_window
        ));
    }

    let frame = SignalFrame::compute(&series, &params.signal_params()).map_err(ParamError::from)?;

    let (gated, baseline, kpis) = match compute_returns(&series, &frame, params.baseline_mode) {
        Ok((gated, baseline)) => {
            let kpis = KpiComparison {
                gated: KpiBundle::compute(&gated, params.risk_free_rate),
                baseline: KpiBundle::compute(&baseline, params.risk_free_rate),
                baseline_mode: params.baseline_mode,
            };
            (Some(gated), Some(baseline), kpis)
        }
        Err(ReturnsError::InsufficientData { len }) => {
            warn!(bars = len, "series too short for return math; KPIs undefined");
            warnings.push(format!(
                "only {len} bar(s) of history; returns and KPIs are not computable"
            ));
            let kpis = KpiComparison {
                gated: KpiBundle::undefined(ReturnsKind::SignalGated),
                baseline: KpiBundle::undefined(params.baseline_mode.returns_kind()),
                baseline_mode: params.baseline_mode,
            };
            (None, None, kpis)
        }
    };

    let transition_count = frame.transition_count();
    info!(
        symbol = %params.symbol,
        bars = bar_count,
        transitions = transition_count,
        warnings = warnings.len(),
        "study complete"
    );

    Ok(StudyResult {
        schema_version: SCHEMA_VERSION,
        params: params.clone(),
        symbol: series.symbol().to_string(),
        source: fetched.source,
        start_date,
        end_date,
        bar_count,
        transition_count,
        series,
        frame,
        gated,
        baseline,
        kpis,
        warnings,
    })
}

fn compute_returns(
    series: &PriceSeries,
    frame: &SignalFrame,
    mode: BaselineMode,
) -> Result<(ReturnsSeries, ReturnsSeries), ReturnsError> {
    let gated = ReturnsSeries::signal_gated(series, &frame.signal)?;
    let baseline = match mode {
        BaselineMode::EntryAnchored => ReturnsSeries::entry_anchored(series, &frame.position)?,
        BaselineMode::BuyAndHold => ReturnsSeries::buy_and_hold(series)?,
    };
    Ok((gated, baseline))
}

/// Test provider serving a fixed close sequence, one calendar day apart,
/// whatever the requested range. Used by presentation-module tests as well.
#[cfg(test)]
pub(crate) struct FixedProvider {
    pub(crate) closes: Vec<f64>,
}

#[cfg(test)]
impl QuoteProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(
        &self,
        symbol: &str,
        _start: chrono::NaiveDate,
        _end: chrono::NaiveDate,
    ) -> Result<crosslab_core::data::FetchResult, DataError> {
        use crosslab_core::data::{DataSource, FetchResult};
        use crosslab_core::domain::PricePoint;

        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = self
            .closes
            .iter()
            .enumerate()
            .map(|(i, &adj_close)| PricePoint {
                date: base + chrono::Duration::days(i as i64),
                adj_close,
            })
            .collect();
        let series = PriceSeries::new(symbol, points)?;
        Ok(FetchResult {
            series,
            source: DataSource::Synthetic,
        })
    }
}

/// Run a study over a fixed close sequence.
#[cfg(test)]
pub(crate) fn study_from_closes(params: &StudyParams, closes: &[f64]) -> StudyResult {
    run_study(
        params,
        &FixedProvider {
            closes: closes.to_vec(),
        },
    )
    .expect("study over fixed closes")
}
