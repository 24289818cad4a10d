//! Raw export line groups and parse errors.
//!
//! A Stages export is a quasi-CSV stream: per-second sample rows with summary
//! tables spliced in between them. These types carry the raw text through
//! segmentation so later failures can point back at the exact source line.

use thiserror::Error;

/// How the segmenter classified a raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Sample row (or anything unrecognised, which surfaces later as a parse failure)
    Data,
    /// Stage/ride transition marker, e.g. `Stage 1` or `Ride`
    Marker,
    /// Closing line of an embedded summary table, e.g. `KJ,5`
    SummaryEnd,
}

/// One line of the source export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the source file
    pub number: usize,
    /// Line text without the trailing newline
    pub text: String,
    /// Segmenter classification
    pub kind: LineKind,
}

impl RawLine {
    /// Create a new raw line.
    pub fn new(number: usize, text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            number,
            text: text.into(),
            kind,
        }
    }
}

/// Ordered sequence of raw lines forming one stage block or one summary table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLineGroup {
    lines: Vec<RawLine>,
}

impl RawLineGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group of data lines numbered from `first_line`.
    ///
    /// Handy for feeding hand-written rows straight into the stage parser.
    pub fn from_data_lines<I, S>(first_line: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(offset, text)| RawLine::new(first_line + offset, text, LineKind::Data))
            .collect();
        Self { lines }
    }

    /// Append a line.
    pub fn push(&mut self, line: RawLine) {
        self.lines.push(line);
    }

    /// All lines, markers included.
    pub fn lines(&self) -> &[RawLine] {
        &self.lines
    }

    /// Lines classified as sample rows.
    pub fn data_lines(&self) -> impl Iterator<Item = &RawLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Data)
    }

    /// Number of lines, markers included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the group holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line number of the first line, if any.
    pub fn first_line_number(&self) -> Option<usize> {
        self.lines.first().map(|l| l.number)
    }
}

/// Output of the segmenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedExport {
    /// Per-stage blocks of sample rows, in file order
    pub stage_groups: Vec<RawLineGroup>,
    /// Embedded summary tables, each ending with its end-marker line
    pub summary_groups: Vec<RawLineGroup>,
}

/// Errors raised while reading or parsing an export.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Export has {found} lines but {expected} header lines are expected")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("Malformed row at line {line}: {reason} ({raw:?})")]
    MalformedRow {
        line: usize,
        raw: String,
        reason: String,
    },

    #[error("Invalid elapsed time {value:?} at line {line}")]
    InvalidClock { line: usize, value: String },

    #[error("Distance went backwards at line {line}: {previous} -> {current} mi")]
    DistanceDecreased {
        line: usize,
        previous: f64,
        current: f64,
    },
}
