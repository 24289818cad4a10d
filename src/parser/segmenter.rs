//! Segmenter for raw Stages exports.
//!
//! The bike splices summary tables between the per-second rows whenever a
//! stage ends, so the file cannot be read as one CSV table. The segmenter
//! walks the lines once with a single buffer and splits them into stage
//! blocks and summary blocks.
//!
//! With several stages the device only writes summary tables for the ride and
//! for the stages before the last one. That is passed through untouched here;
//! see [`crate::metrics::reconcile`] for backing the last stage out.

use crate::parser::types::{LineKind, ParseError, RawLine, RawLineGroup, SegmentedExport};
use crate::storage::config::ParserConfig;
use std::path::Path;

/// Keywords that drive segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRules {
    /// First tokens that start a new stage/ride block
    pub stage_keywords: Vec<String>,
    /// First token of the line that closes a summary table
    pub summary_end_keyword: String,
}

impl Default for MarkerRules {
    fn default() -> Self {
        Self {
            stage_keywords: vec!["Stage".to_string(), "Ride".to_string()],
            summary_end_keyword: "KJ".to_string(),
        }
    }
}

impl MarkerRules {
    /// Classify a line by its first token.
    pub fn classify(&self, line: &str) -> LineKind {
        match first_token(line) {
            Some(token) if token == self.summary_end_keyword => LineKind::SummaryEnd,
            Some(token) if self.stage_keywords.iter().any(|k| k == token) => LineKind::Marker,
            _ => LineKind::Data,
        }
    }
}

/// First whitespace- or comma-delimited token of a line.
fn first_token(line: &str) -> Option<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .find(|token| !token.is_empty())
}

/// Split export lines (header already removed) into stage and summary groups.
///
/// `first_line` is the source line number of the first item, used for error
/// reporting further down the pipeline. Blank lines are skipped.
pub fn segment_lines<I, S>(lines: I, first_line: usize, rules: &MarkerRules) -> SegmentedExport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut export = SegmentedExport::default();
    let mut buffer = RawLineGroup::new();

    for (offset, line) in lines.into_iter().enumerate() {
        let text = line.as_ref().trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            continue;
        }

        let kind = rules.classify(text);
        let raw = RawLine::new(first_line + offset, text, kind);

        match kind {
            LineKind::Marker => {
                // Stage transition: whatever was buffered is a finished stage,
                // even when nothing was buffered since the last summary table
                export.stage_groups.push(std::mem::take(&mut buffer));
                buffer.push(raw);
            }
            LineKind::SummaryEnd => {
                buffer.push(raw);
                export.summary_groups.push(std::mem::take(&mut buffer));
            }
            LineKind::Data => buffer.push(raw),
        }
    }

    // Ride stopped without a final summary table
    if !buffer.is_empty() {
        export.stage_groups.push(buffer);
    }

    tracing::debug!(
        "Segmented export into {} stage group(s) and {} summary table(s)",
        export.stage_groups.len(),
        export.summary_groups.len()
    );

    export
}

/// Segment the full text of an export, skipping the fixed header region.
pub fn segment_export(content: &str, config: &ParserConfig) -> Result<SegmentedExport, ParseError> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < config.header_lines {
        return Err(ParseError::TruncatedHeader {
            expected: config.header_lines,
            found: lines.len(),
        });
    }

    Ok(segment_lines(
        &lines[config.header_lines..],
        config.header_lines + 1,
        &config.marker_rules(),
    ))
}

/// Read and segment an export file from disk.
pub fn read_export_file(path: &Path, config: &ParserConfig) -> Result<SegmentedExport, ParseError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ParseError::IoError(format!("{}: {}", path.display(), e)))?;

    segment_export(&content, config)
}
