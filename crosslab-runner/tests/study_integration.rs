//! Integration tests for the study pipeline: full runs through the public
//! API, from provider fetch to KPIs, report, and saved artifacts.
//!
//! Uses the deterministic synthetic provider for realistic multi-year runs
//! and small fixed-close providers for hand-checkable scenarios.

use chrono::{Duration, NaiveDate};

use crosslab_core::data::{DataError, DataSource, FetchResult, QuoteProvider, SyntheticProvider};
use crosslab_core::domain::{PricePoint, PriceSeries};
use crosslab_core::indicators::IndicatorKind;
use crosslab_core::returns::ReturnsKind;
use crosslab_runner::params::{BaselineMode, StudyParams};
use crosslab_runner::pipeline::{run_study, StudyError};
use crosslab_runner::{export, report};

/// Provider that serves a fixed list of closes on consecutive days,
/// ignoring the requested range.
struct ClosesProvider {
    closes: Vec<f64>,
}

impl QuoteProvider for ClosesProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = self
            .closes
            .iter()
            .enumerate()
            .map(|(i, &adj_close)| PricePoint {
                date: base + Duration::days(i as i64),
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

struct FailingProvider;

impl QuoteProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        Err(DataError::NetworkUnreachable("connection refused".into()))
    }
}

fn study_params(short: usize, long: usize, indicator: IndicatorKind) -> StudyParams {
    StudyParams {
        symbol: "SPY".into(),
        short_window: short,
        long_window: long,
        indicator,
        start_years_ago: 2,
        end_years_ago: 0,
        ..StudyParams::default()
    }
}

// ── End-to-end on synthetic data ─────────────────────────────────

#[test]
fn synthetic_sma_study_end_to_end() {
    let params = study_params(10, 50, IndicatorKind::Sma);
    let result = run_study(&params, &SyntheticProvider::new(42)).unwrap();

    // Two years of weekdays, minus nothing: well over 400 bars.
    assert!(
        result.bar_count > 400,
        "expected ~2 years of bars, got {}",
        result.bar_count
    );
    assert_eq!(result.series.len(), result.bar_count);
    assert_eq!(result.frame.signal.len(), result.bar_count);
    assert_eq!(result.frame.position.len(), result.bar_count);
    assert_eq!(result.start_date, result.series.first_date().unwrap());
    assert_eq!(result.end_date, result.series.last_date().unwrap());

    let gated = result.gated.as_ref().unwrap();
    let baseline = result.baseline.as_ref().unwrap();
    assert_eq!(gated.len(), result.bar_count);
    assert_eq!(baseline.len(), result.bar_count);
    assert_eq!(gated.kind, ReturnsKind::SignalGated);
    assert_eq!(baseline.kind, ReturnsKind::EntryAnchored);

    assert_eq!(
        result.frame.buys().count() + result.frame.sells().count(),
        result.transition_count
    );

    let kpis = &result.kpis;
    assert!(kpis.gated.cagr.is_some());
    assert!(kpis.baseline.cagr.is_some());
    assert!(kpis.gated.max_drawdown.unwrap() <= 0.0);
    assert!(kpis.gated.total_return_multiple.unwrap() > 0.0);
    assert!(
        result.warnings.is_empty(),
        "unexpected warnings: {:?}",
        result.warnings
    );

    println!(
        "SPY 10/50 SMA: {} bars, {} transitions, gated CAGR {}",
        result.bar_count,
        result.transition_count,
        report::fmt_percent(kpis.gated.cagr, 1)
    );
}

#[test]
fn synthetic_ema_study_end_to_end() {
    let params = study_params(5, 20, IndicatorKind::Ema);
    let result = run_study(&params, &SyntheticProvider::new(42)).unwrap();

    assert_eq!(result.frame.params.kind, IndicatorKind::Ema);
    // EMAs are defined from the first bar; no warm-up holes.
    assert!(result.frame.short_avg.iter().all(|v| v.is_some()));
    assert!(result.frame.long_avg.iter().all(|v| v.is_some()));
    assert!(result.gated.is_some());
    assert!(result.kpis.gated.cagr.is_some());
}

// ── Failure and degenerate inputs ────────────────────────────────

#[test]
fn fetch_failure_is_typed() {
    let params = study_params(10, 50, IndicatorKind::Sma);
    let err = run_study(&params, &FailingProvider).unwrap_err();

    assert!(matches!(
        err,
        StudyError::Data(DataError::NetworkUnreachable(_))
    ));
    assert!(err.to_string().contains("data error"));
}

#[test]
fn single_bar_yields_undefined_kpis() {
    let provider = ClosesProvider {
        closes: vec![100.0],
    };
    let result = run_study(&study_params(1, 2, IndicatorKind::Sma), &provider).unwrap();

    assert!(result.gated.is_none());
    assert!(result.baseline.is_none());
    assert_eq!(result.kpis.gated.cagr, None);
    assert_eq!(result.kpis.baseline.sharpe, None);
    assert!(result.warnings.iter().any(|w| w.contains("1 bar")));

    let md = report::generate_report(&result);
    assert!(md.contains("| CAGR | n/a | n/a |"));
}

#[test]
fn long_window_warning_flows_to_report() {
    let provider = ClosesProvider {
        closes: vec![100.0, 101.0, 102.0, 103.0],
    };
    let result = run_study(&study_params(2, 50, IndicatorKind::Sma), &provider).unwrap();

    assert!(result.warnings.iter().any(|w| w.contains("long window")));
    let md = report::generate_report(&result);
    assert!(md.contains("## Warnings"));
}

// ── Baseline selection ───────────────────────────────────────────

#[test]
fn baseline_mode_selects_comparison_strategy() {
    let closes = vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 5.0, 5.0, 5.0];
    let mut params = study_params(1, 3, IndicatorKind::Sma);

    let anchored = run_study(
        &params,
        &ClosesProvider {
            closes: closes.clone(),
        },
    )
    .unwrap();
    params.baseline_mode = BaselineMode::BuyAndHold;
    let bnh = run_study(&params, &ClosesProvider { closes }).unwrap();

    assert_eq!(
        anchored.baseline.as_ref().unwrap().kind,
        ReturnsKind::EntryAnchored
    );
    assert_eq!(
        bnh.baseline.as_ref().unwrap().kind,
        ReturnsKind::BuyAndHold
    );
    assert_eq!(anchored.kpis.baseline_mode, BaselineMode::EntryAnchored);
    assert_eq!(bnh.kpis.baseline_mode, BaselineMode::BuyAndHold);

    // Buy-and-hold rides the 10 -> 20 jump that happens before the signal's
    // entry; the anchored baseline does not, so the KPIs must disagree.
    assert_ne!(anchored.kpis.baseline, bnh.kpis.baseline);
}

// ── Worked example ───────────────────────────────────────────────

#[test]
fn worked_crossover_example() {
    let provider = ClosesProvider {
        closes: vec![100.0, 110.0, 99.0, 108.0],
    };
    let result = run_study(&study_params(1, 2, IndicatorKind::Sma), &provider).unwrap();

    // The lagged signal is long only on the -10% day: 0.9x overall.
    let gated = result.gated.as_ref().unwrap();
    let last = gated.final_cumulative().unwrap();
    assert!((last - 0.9).abs() < 1e-9, "expected 0.9, got {last}");
    assert!((result.kpis.gated.total_return_multiple.unwrap() - 0.9).abs() < 1e-9);
    assert_eq!(result.transition_count, 2);
}

// ── Artifacts and serialization ──────────────────────────────────

#[test]
fn artifacts_roundtrip_through_disk() {
    let params = study_params(10, 50, IndicatorKind::Sma);
    let result = run_study(&params, &SyntheticProvider::new(7)).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = export::save_artifacts(&result, tmp.path()).unwrap();
    let restored = export::load_artifacts(&dir).unwrap();

    assert_eq!(restored.symbol, result.symbol);
    assert_eq!(restored.bar_count, result.bar_count);
    assert_eq!(restored.kpis.gated, result.kpis.gated);
    assert_eq!(restored.frame.markers.len(), result.frame.markers.len());
}

#[test]
fn study_result_serializes_to_json() {
    let params = study_params(10, 50, IndicatorKind::Sma);
    let result = run_study(&params, &SyntheticProvider::new(42)).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("schema_version").is_some());
    assert!(value.get("kpis").is_some());
    assert!(value.get("frame").is_some());
    assert!(value.get("series").is_some());
}
