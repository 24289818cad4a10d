//! Unit tests for export segmentation.

use stagesride::parser::segmenter::{segment_export, segment_lines, MarkerRules};
use stagesride::parser::types::LineKind;
use stagesride::storage::config::ParserConfig;

/// Export with two stages: a summary table after stage 1, none after stage 2.
const UNFINALIZED_EXPORT: &str = "\
Stages Cycling Export
Rider: Test
Time,Miles,MPH,Watts,HR,RPM
00:00,0.00,15.0,150,120,85
00:01,0.01,15.2,152,121,86
Stage 1
Time,00:01
Miles,0.01
KJ,1
00:02,0.02,16.0,160,122,87
00:03,0.03,16.1,161,123,88
";

#[test]
fn test_one_summary_then_trailing_stage() {
    let export = segment_export(UNFINALIZED_EXPORT, &ParserConfig::default()).unwrap();

    assert_eq!(export.stage_groups.len(), 2);
    assert_eq!(export.summary_groups.len(), 1);
}

#[test]
fn test_summary_group_keeps_end_marker() {
    let export = segment_export(UNFINALIZED_EXPORT, &ParserConfig::default()).unwrap();
    let summary = &export.summary_groups[0];

    let last = summary.lines().last().unwrap();
    assert_eq!(last.text, "KJ,1");
    assert_eq!(last.kind, LineKind::SummaryEnd);
    assert_eq!(summary.lines()[0].kind, LineKind::Marker);
}

#[test]
fn test_line_numbers_follow_source_file() {
    let export = segment_export(UNFINALIZED_EXPORT, &ParserConfig::default()).unwrap();

    assert_eq!(export.stage_groups[0].first_line_number(), Some(4));
    assert_eq!(export.summary_groups[0].first_line_number(), Some(6));
    assert_eq!(export.stage_groups[1].first_line_number(), Some(10));
}

#[test]
fn test_stage_rows_then_summary() {
    let lines = [
        "00:01,0.10,12.0,80,110,70\n",
        "00:02,0.20,12.5,85,111,71\n",
        "Stage 1\n",
        "KJ,5\n",
    ];
    let export = segment_lines(lines, 4, &MarkerRules::default());

    assert_eq!(export.stage_groups.len(), 1);
    assert_eq!(export.stage_groups[0].data_lines().count(), 2);
    assert_eq!(export.summary_groups.len(), 1);
}

#[test]
fn test_leading_marker_flushes_empty_stage() {
    // A marker before any rows flushes an empty stage and heads the summary table
    let lines = [
        "Stage 1",
        "00:01,0.10,12.0,80,110,70",
        "00:02,0.20,12.5,85,111,71",
        "KJ,5",
    ];
    let export = segment_lines(lines, 4, &MarkerRules::default());

    assert_eq!(export.stage_groups.len(), 1);
    assert!(export.stage_groups[0].is_empty());
    assert_eq!(export.summary_groups.len(), 1);
    assert_eq!(export.summary_groups[0].len(), 4);
}

#[test]
fn test_ride_summary_terminates_final_stage() {
    let lines = [
        "00:01,0.10,12.0,80,110,70",
        "Stage 1",
        "KJ,5",
        "00:02,0.20,12.5,85,111,71",
        "Ride",
        "KJ,9",
    ];
    let export = segment_lines(lines, 1, &MarkerRules::default());

    assert_eq!(export.stage_groups.len(), 2);
    assert_eq!(export.summary_groups.len(), 2);
    assert_eq!(export.summary_groups[1].lines()[0].text, "Ride");
}

#[test]
fn test_windows_line_endings() {
    let content = "h1\r\nh2\r\nh3\r\n00:01,0.10,12.0,80,110,70\r\nStage 1\r\nKJ,5\r\n";
    let export = segment_export(content, &ParserConfig::default()).unwrap();

    assert_eq!(export.stage_groups[0].lines()[0].text, "00:01,0.10,12.0,80,110,70");
    assert_eq!(export.summary_groups[0].lines()[1].kind, LineKind::SummaryEnd);
}

#[test]
fn test_summary_followed_by_ride_marker_keeps_stage_count() {
    let lines = [
        "00:01,0.10,12.0,80,110,70",
        "Stage 1",
        "KJ,5",
        "Ride",
        "KJ,9",
    ];
    let export = segment_lines(lines, 4, &MarkerRules::default());

    assert_eq!(export.stage_groups.len(), 2);
    assert_eq!(export.stage_groups[1].len(), 0);
    assert_eq!(export.summary_groups.len(), 2);
}
