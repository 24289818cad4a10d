//! Metrics module for time series and ride summaries.

pub mod reconcile;
pub mod series;
pub mod summary;

pub use reconcile::{derive_final_stage, ReconcileError, StageTotals};
pub use series::{build_series, parse_stage, Sample, TimeSeries};
pub use summary::{format_elapsed, summarize, EnergyTotal, StageSummary, SummaryError};
