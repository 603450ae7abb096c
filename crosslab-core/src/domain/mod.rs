//! Domain types for the crossover study.

pub mod series;

pub use series::{PricePoint, PriceSeries, SeriesError};
