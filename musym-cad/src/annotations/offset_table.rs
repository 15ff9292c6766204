//! Bar/pulse cadence tables
//!
//! Each piece has its own CSV file (Windows-1252). The file starts with a
//! block of descriptive rows; the cadence table proper begins at the row whose
//! "Descriptive Information" cell reads "Cad Cat.". That row is the header of
//! the cadence table and every row below it is a cadence, with its category
//! (PAC, HC, ...) in that same column.

use crate::error::{LoadError, LoadResult};
use crate::types::{Cadence, CadencePosition};
use encoding_rs::WINDOWS_1252;
use std::path::Path;

const DESCRIPTION_COLUMN: &str = "Descriptive Information";
const SENTINEL: &str = "Cad Cat.";
const BAR_COLUMN: &str = "Bar #";
const PULSE_COLUMN: &str = "Pulse #";

/// Parse a cadence table file into cadences at (bar, beat) positions
pub fn parse_offset_table(path: &Path, include_type: bool) -> LoadResult<Vec<Cadence>> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    parse_offset_table_bytes(&bytes, &path.display().to_string(), include_type)
}

/// Parse raw cadence table bytes; `source_name` is used in error messages
pub fn parse_offset_table_bytes(bytes: &[u8], source_name: &str, include_type: bool) -> LoadResult<Vec<Cadence>> {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    let rows = read_rows(&text, source_name)?;

    let (header, data) = rows
        .split_first()
        .ok_or_else(|| LoadError::format(source_name, "table is empty"))?;

    let description_col = column_index(header, DESCRIPTION_COLUMN)
        .ok_or_else(|| LoadError::format(source_name, format!("missing '{}' column", DESCRIPTION_COLUMN)))?;

    let sentinel_row = data
        .iter()
        .position(|row| cell(row, description_col) == SENTINEL)
        .ok_or_else(|| LoadError::format(source_name, format!("sentinel row '{}' not found", SENTINEL)))?;

    // The sentinel row becomes the header of the cadence table
    let cadence_header = &data[sentinel_row];
    let body = &data[sentinel_row + 1..];

    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(cadence_header.len()))
        .max()
        .unwrap_or(0);
    let kept_columns: Vec<usize> = (0..width)
        .filter(|&col| body.iter().any(|row| !cell(row, col).is_empty()))
        .collect();
    let kept_header: Vec<&str> = kept_columns.iter().map(|&col| cell(cadence_header, col)).collect();

    // Duplicate header names resolve to the right-most column
    let bar_col = kept_header
        .iter()
        .rposition(|name| *name == BAR_COLUMN)
        .map(|i| kept_columns[i])
        .ok_or_else(|| LoadError::format(source_name, format!("missing '{}' column", BAR_COLUMN)))?;
    let pulse_col = kept_header
        .iter()
        .rposition(|name| *name == PULSE_COLUMN)
        .map(|i| kept_columns[i])
        .ok_or_else(|| LoadError::format(source_name, format!("missing '{}' column", PULSE_COLUMN)))?;

    let mut cadences = Vec::new();
    for (offset, row) in body.iter().enumerate() {
        if kept_columns.iter().all(|&col| cell(row, col).is_empty()) {
            continue;
        }
        let line = sentinel_row + offset + 3;
        let bar = parse_bar(cell(row, bar_col))
            .ok_or_else(|| LoadError::format(source_name, format!("line {}: invalid bar '{}'", line, cell(row, bar_col))))?;
        let pulse: f64 = cell(row, pulse_col)
            .parse()
            .map_err(|_| LoadError::format(source_name, format!("line {}: invalid pulse '{}'", line, cell(row, pulse_col))))?;
        let kind = cell(row, description_col);
        cadences.push(Cadence {
            position: CadencePosition::BarBeat { bar, beat: pulse - 1.0 },
            kind: (include_type && !kind.is_empty()).then(|| kind.to_string()),
        });
    }

    tracing::debug!(source = %source_name, cadences = cadences.len(), "Parsed cadence table");
    Ok(cadences)
}

fn read_rows(text: &str, source_name: &str) -> LoadResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(|c| c.trim().to_string()).collect())
                .map_err(|e| LoadError::format(source_name, e.to_string()))
        })
        .collect()
}

fn column_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h == name)
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// Bars may be written as "12" or "12.0"
fn parse_bar(value: &str) -> Option<i64> {
    if let Ok(bar) = value.parse::<i64>() {
        return Some(bar);
    }
    let bar: f64 = value.parse().ok()?;
    (bar.fract() == 0.0).then_some(bar as i64)
}
