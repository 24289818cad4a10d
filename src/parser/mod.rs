//! Parser module for raw Stages CSV exports.

pub mod layout;
pub mod segmenter;
pub mod types;

pub use layout::{parse_clock, ColumnLayout};
pub use segmenter::{read_export_file, segment_export, segment_lines, MarkerRules};
pub use types::{LineKind, ParseError, RawLine, RawLineGroup, SegmentedExport};
