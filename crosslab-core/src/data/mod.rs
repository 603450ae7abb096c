//! Data providers and the fetch boundary.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{lookback_window, DataError, DataSource, FetchResult, QuoteProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
