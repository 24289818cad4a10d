//! Stage and full-ride summaries.
//!
//! Unless otherwise stated distances are miles and speeds are mph.

use crate::metrics::series::{Sample, TimeSeries};
use serde::Serialize;
use thiserror::Error;

/// An energy total that may not have been computed.
///
/// Kept distinct from a computed zero so consumers never read "0 kJ" for a
/// value nobody calculated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum EnergyTotal {
    /// Calculation is not supported for this export
    #[default]
    NotComputed,
    /// Computed total
    Computed(f64),
}

impl EnergyTotal {
    /// The computed value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            EnergyTotal::NotComputed => None,
            EnergyTotal::Computed(v) => Some(*v),
        }
    }
}

/// Summary statistics for one stage or the full ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    /// Display label, e.g. "Full Ride" or "Stage 2"
    pub name: String,
    /// Number of samples summarised
    pub sample_count: usize,
    /// Last elapsed second minus first elapsed second
    pub total_seconds: u32,
    /// Odometer delta (max minus min) in miles
    pub total_distance: f64,

    pub avg_speed: f64,
    pub avg_watts: f64,
    pub avg_rpm: f64,
    /// None when the series has no heart-rate column
    pub avg_hr: Option<f64>,
    /// Samples that carried a heart-rate reading
    pub heart_rate_samples: usize,

    pub max_speed: f64,
    pub max_watts: f64,
    pub max_rpm: f64,
    pub max_hr: Option<f64>,

    /// Calculation currently unsupported
    pub total_kilocalories: EnergyTotal,
    /// Calculation currently unsupported
    pub total_kilojoules: EnergyTotal,
}

/// Errors from summarising a series.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Cannot summarise {name}: series has no samples")]
    EmptySeries { name: String },
}

/// Mean and maximum of one column.
fn mean_max(samples: &[Sample], field: impl Fn(&Sample) -> f64) -> (f64, f64) {
    let (sum, max) = samples
        .iter()
        .map(field)
        .fold((0.0, f64::NEG_INFINITY), |(sum, max), v| (sum + v, max.max(v)));
    (sum / samples.len() as f64, max)
}

/// Summarise a series under the given name.
pub fn summarize(series: &TimeSeries, name: impl Into<String>) -> Result<StageSummary, SummaryError> {
    let name = name.into();
    let samples = series.samples();
    let (first, last) = series
        .elapsed_range()
        .ok_or_else(|| SummaryError::EmptySeries { name: name.clone() })?;

    // The odometer does not reset between stages, so only the delta is meaningful
    let (min_distance, max_distance) = samples.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.distance_miles), hi.max(s.distance_miles)),
    );

    let (avg_speed, max_speed) = mean_max(samples, |s| s.speed_mph);
    let (avg_watts, max_watts) = mean_max(samples, |s| s.power_watts);
    let (avg_rpm, max_rpm) = mean_max(samples, |s| s.cadence_rpm);

    let heart_rates: Vec<f64> = samples.iter().filter_map(|s| s.heart_rate_bpm).collect();
    let (avg_hr, max_hr, heart_rate_samples) = if series.has_heart_rate() && !heart_rates.is_empty() {
        let sum: f64 = heart_rates.iter().sum();
        let max = heart_rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (Some(sum / heart_rates.len() as f64), Some(max), heart_rates.len())
    } else {
        (None, None, 0)
    };

    Ok(StageSummary {
        name,
        sample_count: samples.len(),
        total_seconds: last.saturating_sub(first),
        total_distance: max_distance - min_distance,
        avg_speed,
        avg_watts,
        avg_rpm,
        avg_hr,
        heart_rate_samples,
        max_speed,
        max_watts,
        max_rpm,
        max_hr,
        total_kilocalories: EnergyTotal::NotComputed,
        total_kilojoules: EnergyTotal::NotComputed,
    })
}

/// Render seconds as `H:MM:SS`.
pub fn format_elapsed(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

impl StageSummary {
    /// Write every line after the title.
    pub(crate) fn write_body(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Elapsed Time:  {}", format_elapsed(self.total_seconds))?;
        writeln!(f, "Distance (mi): {:.2}", self.total_distance)?;
        writeln!(f)?;
        writeln!(f, "Average MPH:   {:.2}", self.avg_speed)?;
        writeln!(f, "Average Watts: {:.0}", self.avg_watts)?;
        writeln!(f, "Average RPM:   {:.0}", self.avg_rpm)?;
        if let Some(hr) = self.avg_hr {
            writeln!(f, "Average HR:    {:.0}", hr)?;
        }
        writeln!(f)?;
        writeln!(f, "Max MPH:   {:.2}", self.max_speed)?;
        writeln!(f, "Max Watts: {:.0}", self.max_watts)?;
        write!(f, "Max RPM:   {:.0}", self.max_rpm)?;
        if let Some(hr) = self.max_hr {
            write!(f, "\nMax HR:    {:.0}", hr)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for StageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        self.write_body(f)
    }
}
