//! Device summary tables spliced into the export.

use crate::parser::types::{LineKind, RawLineGroup};
use serde::Serialize;

/// One `label,value,...` line of a summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// First field
    pub label: String,
    /// Remaining fields, trimmed
    pub values: Vec<String>,
}

/// A summary table as written by the bike.
///
/// The table layout is not documented, so rows are kept as raw label/value
/// pairs. Only the closing kilojoule line is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Text of the stage/ride marker line that opened the table
    pub title: Option<String>,
    /// Table rows, closing line included
    pub rows: Vec<SummaryRow>,
    /// Kilojoule total from the closing line, when it parses
    pub device_kilojoules: Option<f64>,
}

impl SummaryTable {
    /// Build a table from a summary group produced by the segmenter.
    pub fn from_group(group: &RawLineGroup) -> Self {
        let mut table = SummaryTable::default();

        for line in group.lines() {
            if line.kind == LineKind::Marker && table.title.is_none() {
                table.title = Some(line.text.trim().to_string());
            }

            let mut fields = line.text.split(',').map(str::trim);
            let label = fields.next().unwrap_or_default().to_string();
            let values: Vec<String> = fields.map(str::to_string).collect();

            if line.kind == LineKind::SummaryEnd {
                table.device_kilojoules = values.iter().find_map(|v| v.parse::<f64>().ok());
            }

            table.rows.push(SummaryRow { label, values });
        }

        table
    }

    /// First value of the row with the given label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.values.first())
            .map(String::as_str)
    }
}
