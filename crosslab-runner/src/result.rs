//! Study result — everything a finished study produces, serializable as one
//! manifest.
//!
//! A `StudyResult` is self-contained: it embeds the fetched price series,
//! the full signal frame, both return series, and the KPI comparison, so a
//! saved manifest can be re-rendered (charts, reports) without refetching.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crosslab_core::data::DataSource;
use crosslab_core::domain::PriceSeries;
use crosslab_core::kpi::KpiBundle;
use crosslab_core::returns::ReturnsSeries;
use crosslab_core::signal::SignalFrame;

use crate::params::{BaselineMode, StudyParams};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// The two KPI columns of the comparison table, with the baseline mode that
/// produced the right-hand one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiComparison {
    /// "Long only w/ signal".
    pub gated: KpiBundle,
    /// "Long only w/o signal".
    pub baseline: KpiBundle,
    pub baseline_mode: BaselineMode,
}

/// Complete result of a single study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// The request that produced this result.
    pub params: StudyParams,
    pub symbol: String,
    pub source: DataSource,
    /// First and last bar actually fetched (not the requested window).
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub transition_count: usize,
    pub series: PriceSeries,
    pub frame: SignalFrame,
    /// `None` when the series was too short to compute returns at all.
    pub gated: Option<ReturnsSeries>,
    pub baseline: Option<ReturnsSeries>,
    pub kpis: KpiComparison,
    /// Data-quality notes, e.g. a long window exceeding the history.
    pub warnings: Vec<String>,
}

/// Default schema version for serde deserialization of older JSON without
/// the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
