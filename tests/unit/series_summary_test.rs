//! Unit tests for stage series and summary statistics.

use stagesride::metrics::series::{build_series, parse_stage, TimeSeries};
use stagesride::metrics::summary::summarize;
use stagesride::parser::layout::ColumnLayout;
use stagesride::parser::segmenter::{segment_lines, MarkerRules};
use stagesride::parser::types::RawLineGroup;

fn rows(first_line: usize, lines: &[&str]) -> RawLineGroup {
    RawLineGroup::from_data_lines(first_line, lines.iter().copied())
}

#[test]
fn test_stage_scenario_summary() {
    let export = segment_lines(
        [
            "00:01,0.10,12.0,80,110,70\n",
            "00:02,0.20,12.5,85,111,71\n",
            "Stage 1\n",
            "KJ,5\n",
        ],
        4,
        &MarkerRules::default(),
    );
    let series = parse_stage(&export.stage_groups[0], ColumnLayout::Timed, false).unwrap();
    let summary = summarize(&series, "Stage 1").unwrap();

    assert_eq!(summary.total_seconds, 1);
    assert!((summary.total_distance - 0.10).abs() < 1e-9);
    assert!((summary.avg_speed - 12.25).abs() < 1e-9);
    assert_eq!(summary.max_speed, 12.5);
}

#[test]
fn test_total_distance_is_delta() {
    let series = parse_stage(
        &rows(
            4,
            &[
                "10:00,3.40,18.0,180,140,90",
                "10:01,3.41,18.2,182,141,90",
                "10:02,3.43,18.4,184,142,91",
            ],
        ),
        ColumnLayout::Timed,
        false,
    )
    .unwrap();
    let summary = summarize(&series, "Stage 2").unwrap();

    assert!((summary.total_distance - 0.03).abs() < 1e-9);
    assert!((summary.total_distance - 3.43).abs() > 1.0);
    assert_eq!(summary.total_seconds, 2);
}

#[test]
fn test_single_row_stage() {
    let series = parse_stage(&rows(4, &["05:00,1.00,14.0,140,130,80"]), ColumnLayout::Timed, false).unwrap();
    let summary = summarize(&series, "Stage 1").unwrap();

    assert_eq!(summary.total_seconds, 0);
    assert_eq!(summary.total_distance, 0.0);
    assert_eq!(summary.avg_speed, summary.max_speed);
    assert_eq!(summary.avg_watts, summary.max_watts);
    assert_eq!(summary.avg_rpm, summary.max_rpm);
    assert_eq!(summary.avg_hr, summary.max_hr);
    assert_eq!(summary.avg_hr, Some(130.0));
}

#[test]
fn test_heart_rate_dropped_from_summary() {
    let series = parse_stage(
        &rows(4, &["00:00,0.00,12.0,80,0,70", "00:01,0.01,12.0,80,0,70"]),
        ColumnLayout::Timed,
        true,
    )
    .unwrap();
    let summary = summarize(&series, "Stage 1").unwrap();

    assert!(summary.avg_hr.is_none());
    assert!(summary.max_hr.is_none());
    assert!(!summary.to_string().contains("HR"));
}

#[test]
fn test_full_ride_preserves_stage_timestamps() {
    let stage_groups = vec![
        rows(4, &["00:00,0.00,12.0,80,110,70", "00:01,0.01,12.0,80,110,70"]),
        rows(9, &["00:05,0.05,14.0,90,115,75", "00:06,0.06,14.0,90,115,75"]),
    ];
    let (stages, full_ride) = build_series(&stage_groups, ColumnLayout::Timed, false).unwrap();

    let concatenated: Vec<u32> = stages
        .iter()
        .flat_map(|s| s.samples().iter().map(|x| x.elapsed_seconds))
        .collect();
    let full: Vec<u32> = full_ride.samples().iter().map(|x| x.elapsed_seconds).collect();
    assert_eq!(full, concatenated);
    assert_eq!(full, vec![0, 1, 5, 6]);

    let summary = summarize(&full_ride, "Full Ride").unwrap();
    assert_eq!(summary.total_seconds, 6);
    assert!((summary.total_distance - 0.06).abs() < 1e-9);
}

#[test]
fn test_untimed_layout() {
    let series = parse_stage(
        &rows(4, &["0.00,12.0,80,110,70", "0.01,12.5,85,111,71"]),
        ColumnLayout::Untimed,
        false,
    )
    .unwrap();
    let summary = summarize(&series, "Stage 1").unwrap();

    assert_eq!(summary.total_seconds, 1);
    assert_eq!(summary.max_watts, 85.0);
}

#[test]
fn test_empty_series_cannot_be_summarised() {
    assert!(summarize(&TimeSeries::default(), "Stage 1").is_err());
}
