//! Workout metadata and error types.

use crate::metrics::reconcile::ReconcileError;
use crate::metrics::summary::SummaryError;
use crate::parser::types::ParseError;
use crate::storage::config::ConfigError;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Metadata carried by the export's filename.
///
/// Files are expected to be named `YYYY-MM-DD <length> <Class Type>.csv`,
/// e.g. `2023-05-01 45m Power Zone.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutFilename {
    /// Date the workout was ridden
    pub workout_date: NaiveDate,
    /// Class type, everything after the length token
    pub class_type: String,
}

/// Errors from reading metadata out of a filename.
#[derive(Debug, Error)]
pub enum FilenameError {
    #[error("Filename {0:?} has no usable stem")]
    MissingStem(String),

    #[error("Filename {stem:?} must look like \"YYYY-MM-DD <length> <class type>\"")]
    TooFewTokens { stem: String },

    #[error("Invalid workout date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
}

/// Split a filename into workout date and class type.
pub fn parse_filename(path: &Path) -> Result<WorkoutFilename, FilenameError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FilenameError::MissingStem(path.display().to_string()))?;

    let too_few = || FilenameError::TooFewTokens {
        stem: stem.to_string(),
    };

    // Date, length label (ignored), then the class type with its own spaces intact
    let (date_str, rest) = stem.split_once(char::is_whitespace).ok_or_else(too_few)?;
    let (_, class_type) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(too_few)?;
    let class_type = class_type.trim();
    if class_type.is_empty() {
        return Err(too_few());
    }

    let workout_date =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| FilenameError::InvalidDate {
            value: date_str.to_string(),
            reason: e.to_string(),
        })?;

    Ok(WorkoutFilename {
        workout_date,
        class_type: class_type.to_string(),
    })
}

/// Errors from loading a full workout.
#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error(transparent)]
    Filename(#[from] FilenameError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Export contains no stage data")]
    NoStages,
}
