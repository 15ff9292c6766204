//! Score-aligned cadence table (TSV)
//!
//! One table covers a whole corpus. Each row is a cadence with its piece
//! (`filename`), measure count (`mc`), onset within the measure as a fraction
//! of a whole note (`onset`), time signature (`timesig`) and cadence type
//! (`cadence`).

use crate::error::{LoadError, LoadResult};
use crate::types::{AnnotationIndex, Cadence};
use std::collections::HashMap;
use std::path::Path;

const TYPE_COLUMN: &str = "cadence";

/// Parse a cadence TSV file grouped by piece
pub fn parse_score_table(path: &Path, include_type: bool) -> LoadResult<AnnotationIndex> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_score_table_str(&text, &path.display().to_string(), include_type)
}

/// Parse cadence TSV text; `source_name` is used in error messages
pub fn parse_score_table_str(
    text: &str,
    source_name: &str,
    include_type: bool,
) -> LoadResult<AnnotationIndex> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: HashMap<String, usize> = reader
        .headers()
        .map_err(|e| LoadError::format(source_name, e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let require = |name: &str| {
        headers
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::format(source_name, format!("missing '{}' column", name)))
    };
    let filename_col = require("filename")?;
    let mc_col = require("mc")?;
    let onset_col = require("onset")?;
    let timesig_col = require("timesig")?;
    let type_col = if include_type { Some(require(TYPE_COLUMN)?) } else { None };

    let mut annotations = AnnotationIndex::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::format(source_name, e.to_string()))?;
        let line = row + 2;
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let filename = field(filename_col);
        if filename.is_empty() {
            return Err(LoadError::format(source_name, format!("line {}: empty filename", line)));
        }
        let mc: i64 = field(mc_col).parse().map_err(|_| {
            LoadError::format(source_name, format!("line {}: invalid mc '{}'", line, field(mc_col)))
        })?;
        let offset = cadence_offset(field(timesig_col), mc, field(onset_col))
            .map_err(|reason| LoadError::format(source_name, format!("line {}: {}", line, reason)))?;

        let mut cadence = Cadence::at(offset);
        if let Some(col) = type_col {
            let kind = field(col);
            if !kind.is_empty() {
                cadence = cadence.with_kind(kind);
            }
        }
        annotations.entry(filename.to_string()).or_default().push(cadence);
    }

    tracing::debug!(
        source = %source_name,
        pieces = annotations.len(),
        "Parsed score-aligned cadence table"
    );
    Ok(annotations)
}

/// Beat offset of a cadence
///
/// `numerator * (mc - 1) + onset_numerator / (denominator / onset_denominator)`
pub fn cadence_offset(timesig: &str, mc: i64, onset: &str) -> Result<f64, String> {
    let (numerator, denominator) =
        parse_fraction(timesig).ok_or_else(|| format!("invalid timesig '{}'", timesig))?;
    let (onset_numerator, onset_denominator) =
        parse_fraction(onset).ok_or_else(|| format!("invalid onset '{}'", onset))?;
    if denominator == 0 || onset_denominator == 0 {
        return Err(format!("zero denominator in timesig '{}' or onset '{}'", timesig, onset));
    }

    Ok(numerator as f64 * (mc - 1) as f64
        + onset_numerator as f64 / (denominator as f64 / onset_denominator as f64))
}

/// "3/8" → (3, 8); a bare integer "2" → (2, 1)
fn parse_fraction(value: &str) -> Option<(i64, i64)> {
    match value.split_once('/') {
        Some((num, den)) => Some((num.trim().parse().ok()?, den.trim().parse().ok()?)),
        None => Some((value.trim().parse().ok()?, 1)),
    }
}
