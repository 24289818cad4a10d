//! Full cycling workout assembled from one export file.

use crate::metrics::reconcile::{derive_final_stage, StageTotals};
use crate::metrics::series::{build_series, TimeSeries};
use crate::metrics::summary::{summarize, StageSummary};
use crate::parser::segmenter::read_export_file;
use crate::parser::types::SegmentedExport;
use crate::recording::summary_table::SummaryTable;
use crate::recording::types::{parse_filename, WorkoutError, WorkoutFilename};
use crate::storage::config::ParserConfig;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Label of the full-ride summary, which sits before the numbered stages.
pub const FULL_RIDE_NAME: &str = "Full Ride";

/// A parsed workout: metadata, series and summaries.
#[derive(Debug, Clone, Serialize)]
pub struct CycleWorkout {
    pub workout_date: NaiveDate,
    pub class_type: String,

    #[serde(skip)]
    pub full_ride: TimeSeries,
    pub full_ride_summary: StageSummary,

    #[serde(skip)]
    pub stages: Vec<TimeSeries>,
    /// Stage summaries, numbered from 1
    pub stage_summaries: Vec<StageSummary>,

    /// Summary tables the device wrote, in file order
    pub summary_tables: Vec<SummaryTable>,
}

impl CycleWorkout {
    /// Parse an export file into a workout.
    ///
    /// The filename is validated before the file is opened.
    pub fn from_path(path: &Path, config: &ParserConfig) -> Result<Self, WorkoutError> {
        let meta = parse_filename(path)?;
        let export = read_export_file(path, config)?;

        let workout = Self::from_export(meta, &export, config)?;
        tracing::info!(
            "Loaded {} {} with {} stage(s)",
            workout.workout_date,
            workout.class_type,
            workout.stages.len()
        );

        Ok(workout)
    }

    /// Build a workout from an already segmented export.
    pub fn from_export(
        meta: WorkoutFilename,
        export: &SegmentedExport,
        config: &ParserConfig,
    ) -> Result<Self, WorkoutError> {
        if export.stage_groups.is_empty() {
            return Err(WorkoutError::NoStages);
        }

        let (stages, full_ride) =
            build_series(&export.stage_groups, config.layout, config.drop_heart_rate)?;

        let full_ride_summary = summarize(&full_ride, FULL_RIDE_NAME)?;
        let stage_summaries = stages
            .iter()
            .enumerate()
            .map(|(idx, stage)| summarize(stage, format!("Stage {}", idx + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        let summary_tables = export
            .summary_groups
            .iter()
            .map(SummaryTable::from_group)
            .collect();

        Ok(Self {
            workout_date: meta.workout_date,
            class_type: meta.class_type,
            full_ride,
            full_ride_summary,
            stages,
            stage_summaries,
            summary_tables,
        })
    }

    /// Recover the last stage's totals from the ride minus the other stages.
    ///
    /// Earlier stages are measured from their first sample to the first sample
    /// of the next stage, so the gap between stages is not charged to the last
    /// one and the backed-out seconds and distance match its own summary.
    ///
    /// Returns None for single-stage workouts, where the ride is the stage.
    pub fn final_stage_from_ride(&self) -> Option<Result<StageTotals, WorkoutError>> {
        let (last, earlier) = self.stage_summaries.split_last()?;
        if earlier.is_empty() {
            return None;
        }

        let earlier: Vec<StageTotals> = earlier
            .iter()
            .zip(self.stages.windows(2))
            .map(|(summary, pair)| {
                let mut totals = StageTotals::from(summary);
                if let (Some(start), Some(next)) = (pair[0].samples().first(), pair[1].samples().first()) {
                    totals.total_seconds = next.elapsed_seconds.saturating_sub(start.elapsed_seconds);
                    totals.total_distance = next.distance_miles - start.distance_miles;
                }
                totals
            })
            .collect();

        Some(
            derive_final_stage(
                &StageTotals::from(&self.full_ride_summary),
                &earlier,
                last.name.clone(),
            )
            .map_err(WorkoutError::from),
        )
    }
}

impl std::fmt::Display for CycleWorkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.workout_date, self.class_type)?;
        self.full_ride_summary.write_body(f)
    }
}
