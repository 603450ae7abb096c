//! Study parameters — the validated request surface of a crossover study.
//!
//! `StudyParams` collects everything a single study needs from the caller:
//! symbol, window pair, indicator kind, the lookback expressed as year
//! offsets from today, the Sharpe risk-free rate, and which baseline fills
//! the "w/o signal" column. Parameters are serde-serializable (the session
//! file and the result manifest both embed them) and loadable from TOML.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crosslab_core::indicators::IndicatorKind;
use crosslab_core::kpi::DEFAULT_RISK_FREE_RATE;
use crosslab_core::returns::ReturnsKind;
use crosslab_core::signal::{SignalError, SignalParams};

/// Errors from parameter validation and config loading.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("invalid signal parameters: {0}")]
    Signal(#[from] SignalError),

    #[error(
        "lookback start ({start} years ago) must lie further back than its end ({end} years ago)"
    )]
    OffsetsOutOfOrder { start: u32, end: u32 },

    #[error("risk-free rate must be finite, got {0}")]
    NonFiniteRate(f64),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which baseline fills the "w/o signal" KPI column.
///
/// The two modes produce materially different columns under the same label;
/// the chosen mode is recorded in every result so the comparison stays
/// interpretable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaselineMode {
    /// Flat until the signal's first entry, long from that bar on. Default.
    EntryAnchored,
    /// Long over the whole series.
    BuyAndHold,
}

impl BaselineMode {
    pub fn label(&self) -> &'static str {
        match self {
            BaselineMode::EntryAnchored => "entry-anchored",
            BaselineMode::BuyAndHold => "buy-and-hold",
        }
    }

    /// The returns-engine variant this mode selects.
    pub fn returns_kind(&self) -> ReturnsKind {
        match self {
            BaselineMode::EntryAnchored => ReturnsKind::EntryAnchored,
            BaselineMode::BuyAndHold => ReturnsKind::BuyAndHold,
        }
    }
}

impl std::fmt::Display for BaselineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BaselineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "entry-anchored" => Ok(BaselineMode::EntryAnchored),
            "buy-and-hold" => Ok(BaselineMode::BuyAndHold),
            other => Err(format!(
                "unknown baseline mode: {other} (expected entry-anchored or buy-and-hold)"
            )),
        }
    }
}

/// Everything one study needs from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyParams {
    /// Ticker symbol, e.g. "SPY".
    pub symbol: String,
    /// Short moving-average window in bars.
    pub short_window: usize,
    /// Long moving-average window in bars.
    pub long_window: usize,
    /// Which moving-average family feeds the crossover.
    pub indicator: IndicatorKind,
    /// Lookback start, in whole years before today.
    pub start_years_ago: u32,
    /// Lookback end, in whole years before today. Must be below the start.
    pub end_years_ago: u32,
    /// Annual risk-free rate for the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Baseline for the "w/o signal" KPI column.
    pub baseline_mode: BaselineMode,
}

impl Default for StudyParams {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            short_window: 10,
            long_window: 50,
            indicator: IndicatorKind::Sma,
            start_years_ago: 30,
            end_years_ago: 0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            baseline_mode: BaselineMode::EntryAnchored,
        }
    }
}

impl StudyParams {
    /// Reject malformed requests before any fetch or computation runs.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.symbol.trim().is_empty() {
            return Err(ParamError::EmptySymbol);
        }
        self.signal_params().validate()?;
        if self.start_years_ago <= self.end_years_ago {
            return Err(ParamError::OffsetsOutOfOrder {
                start: self.start_years_ago,
                end: self.end_years_ago,
            });
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ParamError::NonFiniteRate(self.risk_free_rate));
        }
        Ok(())
    }

    /// The signal-engine view of these parameters.
    pub fn signal_params(&self) -> SignalParams {
        SignalParams::new(self.short_window, self.long_window, self.indicator)
    }

    /// Load and validate parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ParamError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParamError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate parameters from a TOML string.
    ///
    /// Omitted fields take their defaults, so a config file can name only
    /// the parameters it changes.
    pub fn from_toml(content: &str) -> Result<Self, ParamError> {
        let params: Self = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }
}
