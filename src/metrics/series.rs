//! Per-stage and full-ride time series.
//!
//! Each stage block is parsed as a headerless CSV table with a fixed column
//! layout. Elapsed seconds are taken from the device clock column when the
//! firmware writes one; the untimed firmware samples at 1 Hz, so the running
//! sample count is used instead.

use crate::parser::layout::{elapsed_seconds, ColumnLayout};
use crate::parser::types::{ParseError, RawLine, RawLineGroup};
use serde::Serialize;

/// One per-second measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Seconds since the `00:00` clock origin
    pub elapsed_seconds: u32,
    /// Odometer reading in miles, cumulative over the whole ride
    pub distance_miles: f64,
    /// Speed in mph
    pub speed_mph: f64,
    /// Power in watts
    pub power_watts: f64,
    /// Heart rate in bpm (None without a connected sensor)
    pub heart_rate_bpm: Option<f64>,
    /// Cadence in rpm
    pub cadence_rpm: f64,
}

/// Ordered samples for a stage or a full ride.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    samples: Vec<Sample>,
    has_heart_rate: bool,
}

impl TimeSeries {
    /// Create a series from samples.
    ///
    /// When `has_heart_rate` is false any heart-rate values are cleared so the
    /// column is gone entirely rather than half present.
    pub fn new(mut samples: Vec<Sample>, has_heart_rate: bool) -> Self {
        if !has_heart_rate {
            for sample in &mut samples {
                sample.heart_rate_bpm = None;
            }
        }
        Self {
            samples,
            has_heart_rate,
        }
    }

    /// Concatenate series in order without touching their timestamps.
    ///
    /// The result only keeps a heart-rate column if every part has one.
    pub fn concat<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a TimeSeries>,
    {
        let mut samples = Vec::new();
        let mut has_heart_rate = true;
        let mut any = false;

        for part in parts {
            any = true;
            has_heart_rate &= part.has_heart_rate;
            samples.extend_from_slice(&part.samples);
        }

        Self::new(samples, any && has_heart_rate)
    }

    /// The samples in order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the series carries a heart-rate column.
    pub fn has_heart_rate(&self) -> bool {
        self.has_heart_rate
    }

    /// Elapsed seconds of the first and last samples.
    pub fn elapsed_range(&self) -> Option<(u32, u32)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.elapsed_seconds, last.elapsed_seconds))
    }
}

/// Parse one stage block into a time series.
///
/// `drop_heart_rate` removes the heart-rate column entirely; the device still
/// writes the column without a sensor but the values mean nothing.
pub fn parse_stage(
    group: &RawLineGroup,
    layout: ColumnLayout,
    drop_heart_rate: bool,
) -> Result<TimeSeries, ParseError> {
    parse_stage_from(group, layout, drop_heart_rate, 0)
}

/// Parse a stage, numbering untimed samples from `untimed_origin`.
fn parse_stage_from(
    group: &RawLineGroup,
    layout: ColumnLayout,
    drop_heart_rate: bool,
    untimed_origin: u32,
) -> Result<TimeSeries, ParseError> {
    // Every line is a row here; a stray marker surfaces as a malformed row
    let lines: Vec<&RawLine> = group.lines().iter().collect();
    if lines.is_empty() {
        tracing::warn!(
            "Stage block starting at line {} has no sample rows",
            group.first_line_number().unwrap_or_default()
        );
        return Ok(TimeSeries::new(Vec::new(), !drop_heart_rate));
    }

    let block = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    // The bike never quotes fields, so each record maps to exactly one line
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(block.as_bytes());

    let mut samples: Vec<Sample> = Vec::with_capacity(lines.len());

    for (index, (record, line)) in reader.records().zip(lines.iter().copied()).enumerate() {
        let record = record.map_err(|e| malformed(line, e.to_string()))?;
        let fallback = untimed_origin + index as u32;
        let sample = parse_record(&record, line, layout, drop_heart_rate, fallback)?;

        if let Some(previous) = samples.last() {
            if sample.distance_miles < previous.distance_miles {
                return Err(ParseError::DistanceDecreased {
                    line: line.number,
                    previous: previous.distance_miles,
                    current: sample.distance_miles,
                });
            }
        }
        samples.push(sample);
    }

    tracing::debug!(
        "Parsed {} sample(s) from lines {}..={}",
        samples.len(),
        lines[0].number,
        lines[lines.len() - 1].number
    );

    Ok(TimeSeries::new(samples, !drop_heart_rate))
}

fn malformed(line: &RawLine, reason: impl Into<String>) -> ParseError {
    ParseError::MalformedRow {
        line: line.number,
        raw: line.text.clone(),
        reason: reason.into(),
    }
}

/// Parse a numeric field.
fn number(record: &csv::StringRecord, index: usize, name: &str, line: &RawLine) -> Result<f64, ParseError> {
    let value = record.get(index).unwrap_or_default();
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(line, format!("invalid {name} value {value:?}")))
}

fn parse_record(
    record: &csv::StringRecord,
    line: &RawLine,
    layout: ColumnLayout,
    drop_heart_rate: bool,
    untimed_elapsed: u32,
) -> Result<Sample, ParseError> {
    if record.len() != layout.column_count() {
        return Err(malformed(
            line,
            format!(
                "expected {} columns, found {}",
                layout.column_count(),
                record.len()
            ),
        ));
    }

    // Untimed rows are the timed layout shifted left by one column
    let offset = usize::from(layout.has_time_column());

    let elapsed = if layout.has_time_column() {
        let clock = record.get(0).unwrap_or_default();
        elapsed_seconds(clock).ok_or_else(|| ParseError::InvalidClock {
            line: line.number,
            value: clock.to_string(),
        })?
    } else {
        untimed_elapsed
    };

    let heart_rate_bpm = if drop_heart_rate {
        None
    } else {
        match record.get(offset + 3).unwrap_or_default() {
            "" => None,
            _ => Some(number(record, offset + 3, "HR", line)?),
        }
    };

    Ok(Sample {
        elapsed_seconds: elapsed,
        distance_miles: number(record, offset, "Miles", line)?,
        speed_mph: number(record, offset + 1, "MPH", line)?,
        power_watts: number(record, offset + 2, "Watts", line)?,
        heart_rate_bpm,
        cadence_rpm: number(record, offset + 4, "RPM", line)?,
    })
}

/// Parse every stage block and concatenate them into the full ride.
///
/// Timed stages keep the device clock values as written. Untimed stages carry
/// on counting from the previous stage so the full ride stays monotonic.
pub fn build_series(
    stage_groups: &[RawLineGroup],
    layout: ColumnLayout,
    drop_heart_rate: bool,
) -> Result<(Vec<TimeSeries>, TimeSeries), ParseError> {
    let mut stages: Vec<TimeSeries> = Vec::with_capacity(stage_groups.len());
    let mut untimed_origin = 0u32;

    for group in stage_groups {
        let series = parse_stage_from(group, layout, drop_heart_rate, untimed_origin)?;

        // The odometer never resets, so it must not go backwards between stages either
        let previous_distance = stages
            .iter()
            .rev()
            .find_map(|s| s.samples().last())
            .map(|s| s.distance_miles);
        if let (Some(previous), Some(first)) = (previous_distance, series.samples().first()) {
            if first.distance_miles < previous {
                return Err(ParseError::DistanceDecreased {
                    line: group.first_line_number().unwrap_or_default(),
                    previous,
                    current: first.distance_miles,
                });
            }
        }

        if let Some((_, last)) = series.elapsed_range() {
            untimed_origin = last + 1;
        }
        stages.push(series);
    }

    let full_ride = TimeSeries::concat(&stages);
    tracing::debug!(
        "Built {} stage series, {} samples in full ride",
        stages.len(),
        full_ride.len()
    );

    Ok((stages, full_ride))
}
