//! CrossLab Core — crossover signal, returns and KPI engines.
//!
//! This crate contains the analytical heart of the crossover study:
//! - Price series domain type with boundary validation
//! - Quote providers (Yahoo Finance, deterministic synthetic walks)
//! - Moving averages (SMA, EMA) as total functions over optional values
//! - Executed crossover signal with one-bar lag and position transitions
//! - Gated / buy-and-hold / entry-anchored daily and cumulative returns
//! - KPI bundle (CAGR, volatility, Sharpe, max drawdown, return multiple)
//!   with explicit "not computable" semantics
//!
//! Everything here is single-threaded and synchronous; the only blocking
//! call is a provider fetch, which is fallible and typed.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod kpi;
pub mod returns;
pub mod signal;
