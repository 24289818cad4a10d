//! StagesRide - Stages indoor bike export parser
//!
//! Reads the CSV exports written by a Stages bike's onboard computer, splits
//! the per-second samples away from the summary tables the bike splices in
//! between stages, and computes per-stage and full-ride summaries.

pub mod metrics;
pub mod parser;
pub mod recording;
pub mod storage;

// Re-export commonly used types
pub use metrics::summary::StageSummary;
pub use parser::segmenter::read_export_file;
pub use recording::workout::CycleWorkout;
pub use storage::config::ParserConfig;
