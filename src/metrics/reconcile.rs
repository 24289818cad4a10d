//! Backing the final stage out of the ride totals.
//!
//! With more than one stage the bike never writes a summary table for the last
//! stage. Its totals can still be recovered from the ride totals minus every
//! other stage. Averages are weighted by sample count (heart rate by the
//! number of samples that carried a reading), which is exact for a full ride
//! built by concatenating its stages. Maxima cannot be recovered.

use crate::metrics::summary::StageSummary;
use serde::Serialize;
use thiserror::Error;

/// Additive totals of a stage or ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTotals {
    pub name: String,
    pub sample_count: usize,
    pub total_seconds: u32,
    pub total_distance: f64,
    pub avg_speed: f64,
    pub avg_watts: f64,
    pub avg_rpm: f64,
    pub avg_hr: Option<f64>,
    /// Samples behind `avg_hr`
    pub heart_rate_samples: usize,
}

impl From<&StageSummary> for StageTotals {
    fn from(summary: &StageSummary) -> Self {
        Self {
            name: summary.name.clone(),
            sample_count: summary.sample_count,
            total_seconds: summary.total_seconds,
            total_distance: summary.total_distance,
            avg_speed: summary.avg_speed,
            avg_watts: summary.avg_watts,
            avg_rpm: summary.avg_rpm,
            avg_hr: summary.avg_hr,
            heart_rate_samples: summary.heart_rate_samples,
        }
    }
}

/// Errors from reconciling stage totals.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Earlier stages cover {earlier} samples but the ride only has {ride}")]
    NoRemainingSamples { ride: usize, earlier: usize },

    #[error("Earlier stages exceed the ride {field}: {earlier} > {ride}")]
    ExceedsRide {
        field: &'static str,
        ride: f64,
        earlier: f64,
    },
}

/// Derive the last stage's totals from the ride and the stages before it.
pub fn derive_final_stage(
    ride: &StageTotals,
    earlier: &[StageTotals],
    name: impl Into<String>,
) -> Result<StageTotals, ReconcileError> {
    let earlier_samples: usize = earlier.iter().map(|s| s.sample_count).sum();
    if earlier_samples >= ride.sample_count {
        return Err(ReconcileError::NoRemainingSamples {
            ride: ride.sample_count,
            earlier: earlier_samples,
        });
    }
    let remaining = (ride.sample_count - earlier_samples) as f64;

    let earlier_seconds: u32 = earlier.iter().map(|s| s.total_seconds).sum();
    let total_seconds = ride
        .total_seconds
        .checked_sub(earlier_seconds)
        .ok_or(ReconcileError::ExceedsRide {
            field: "elapsed seconds",
            ride: f64::from(ride.total_seconds),
            earlier: f64::from(earlier_seconds),
        })?;

    let earlier_distance: f64 = earlier.iter().map(|s| s.total_distance).sum();
    if earlier_distance > ride.total_distance + f64::EPSILON {
        return Err(ReconcileError::ExceedsRide {
            field: "distance",
            ride: ride.total_distance,
            earlier: earlier_distance,
        });
    }

    let weighted = |ride_avg: f64, avg: fn(&StageTotals) -> f64| {
        let earlier_sum: f64 = earlier.iter().map(|s| avg(s) * s.sample_count as f64).sum();
        (ride_avg * ride.sample_count as f64 - earlier_sum) / remaining
    };

    // Heart rate only survives if every part has it, and only readings count
    let earlier_hr_samples: usize = earlier.iter().map(|s| s.heart_rate_samples).sum();
    let (avg_hr, heart_rate_samples) = match ride.avg_hr {
        Some(ride_hr)
            if earlier.iter().all(|s| s.avg_hr.is_some())
                && ride.heart_rate_samples > earlier_hr_samples =>
        {
            let earlier_sum: f64 = earlier
                .iter()
                .map(|s| s.avg_hr.unwrap_or_default() * s.heart_rate_samples as f64)
                .sum();
            let remaining_hr = ride.heart_rate_samples - earlier_hr_samples;
            let avg = (ride_hr * ride.heart_rate_samples as f64 - earlier_sum) / remaining_hr as f64;
            (Some(avg), remaining_hr)
        }
        _ => (None, 0),
    };

    Ok(StageTotals {
        name: name.into(),
        sample_count: ride.sample_count - earlier_samples,
        total_seconds,
        total_distance: (ride.total_distance - earlier_distance).max(0.0),
        avg_speed: weighted(ride.avg_speed, |s| s.avg_speed),
        avg_watts: weighted(ride.avg_watts, |s| s.avg_watts),
        avg_rpm: weighted(ride.avg_rpm, |s| s.avg_rpm),
        avg_hr,
        heart_rate_samples,
    })
}
