//! CrossLab Runner — study orchestration on top of crosslab-core.
//!
//! - [`params`] holds the serializable study parameters and their validation
//! - [`pipeline`] runs the fetch → signal → returns → KPI pipeline
//! - [`result`] is the versioned, self-contained study manifest
//! - [`chart`] reshapes a result into plot-ready panel series
//! - [`report`] renders the Markdown summary with the KPI comparison table
//! - [`export`] persists manifests, CSV extracts, and artifact directories
//! - [`session`] remembers the last-used parameters between runs

pub mod chart;
pub mod export;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod result;
pub mod session;

pub use chart::{ChartBundle, OverlaySeries, PerformanceSeries};
pub use export::{
    export_curves_csv, export_events_csv, export_json, import_json, load_artifacts,
    save_artifacts,
};
pub use params::{BaselineMode, ParamError, StudyParams};
pub use pipeline::{run_study, StudyError};
pub use report::{fmt_multiple, fmt_percent, fmt_scalar, generate_report};
pub use result::{KpiComparison, StudyResult, SCHEMA_VERSION};
