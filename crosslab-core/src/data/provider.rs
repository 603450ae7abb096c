//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over price sources (Yahoo Finance,
//! synthetic walks) so the pipeline can swap implementations and tests can
//! run without network.

use crate::domain::{PriceSeries, SeriesError};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// A fetch is a single synchronous attempt; every failure mode surfaces here
/// as a typed value the pipeline reacts to. Nothing is swallowed or logged
/// away.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("no data for {symbol} in the requested range")]
    NoData { symbol: String },

    #[error("malformed series from provider: {0}")]
    MalformedSeries(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch: a validated series plus its provenance.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Trait for quote providers.
///
/// Implementations handle the specifics of one source and return a series
/// already validated at this boundary (monotonic dates, sane closes).
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily adjusted closes for a symbol over a date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Resolve a lookback request given in whole years into a concrete window.
///
/// `start_years_ago` and `end_years_ago` count back from `today`; Feb 29
/// anchors clamp to Feb 28 in non-leap years.
pub fn lookback_window(
    today: NaiveDate,
    start_years_ago: u32,
    end_years_ago: u32,
) -> (NaiveDate, NaiveDate) {
    let back = |years: u32| {
        today
            .checked_sub_months(Months::new(years * 12))
            .unwrap_or(NaiveDate::MIN)
    };
    (back(start_years_ago), back(end_years_ago))
}
