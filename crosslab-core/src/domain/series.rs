//! PriceSeries — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Adjusted close for a single symbol on a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// Validation failures raised when a fetched series is malformed.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("dates not strictly increasing at {date} for {symbol}")]
    NonMonotonicDates { symbol: String, date: NaiveDate },

    #[error("non-finite or non-positive close {value} at {date} for {symbol}")]
    InvalidClose {
        symbol: String,
        date: NaiveDate,
        value: f64,
    },
}

/// Daily adjusted-close history for one symbol.
///
/// Dates are strictly increasing; closes are finite and positive. Both are
/// enforced by the constructor, so a malformed series is rejected at the
/// provider boundary and never reaches the engines. Calendar gaps from the
/// data source (weekends, holidays, missing rows) pass through untouched.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and construct a series. An empty point list is allowed here;
    /// providers decide whether "no rows" is an error.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonMonotonicDates {
                    symbol,
                    date: pair[1].date,
                });
            }
        }
        for p in &points {
            if !p.adj_close.is_finite() || p.adj_close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    symbol,
                    date: p.date,
                    value: p.adj_close,
                });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adjusted closes in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.adj_close).collect()
    }

    /// Trading dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample_points() -> Vec<PricePoint> {
        vec![
            PricePoint {
                date: day(2),
                adj_close: 100.0,
            },
            PricePoint {
                date: day(3),
                adj_close: 103.0,
            },
            PricePoint {
                date: day(5),
                adj_close: 101.5,
            },
        ]
    }

    #[test]
    fn valid_series_constructs() {
        let series = PriceSeries::new("SPY", sample_points()).unwrap();
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 103.0, 101.5]);
        assert_eq!(series.first_date(), Some(day(2)));
        assert_eq!(series.last_date(), Some(day(5)));
    }

    #[test]
    fn gap_between_dates_is_fine() {
        // Jan 4 missing above: the source's gap passes through.
        let series = PriceSeries::new("SPY", sample_points()).unwrap();
        assert_eq!(series.dates(), vec![day(2), day(3), day(5)]);
    }

    #[test]
    fn empty_series_constructs() {
        let series = PriceSeries::new("SPY", vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn out_of_order_dates_rejected() {
        let mut points = sample_points();
        points.swap(0, 1);
        let err = PriceSeries::new("SPY", points).unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDates { .. }));
    }

    #[test]
    fn duplicate_date_rejected() {
        let mut points = sample_points();
        points[1].date = points[0].date;
        let err = PriceSeries::new("SPY", points).unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDates { .. }));
    }

    #[test]
    fn nan_close_rejected() {
        let mut points = sample_points();
        points[2].adj_close = f64::NAN;
        let err = PriceSeries::new("SPY", points).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidClose { .. }));
    }

    #[test]
    fn non_positive_close_rejected() {
        let mut points = sample_points();
        points[0].adj_close = 0.0;
        assert!(PriceSeries::new("SPY", points).is_err());
    }

    #[test]
    fn series_serialization_roundtrip() {
        let series = PriceSeries::new("SPY", sample_points()).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let deser: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.symbol(), series.symbol());
        assert_eq!(deser.closes(), series.closes());
        assert_eq!(deser.dates(), series.dates());
    }
}
