//! Cadence annotation parsers
//!
//! One parser per annotation layout:
//! - [`offset_table`]: per-piece CSV tables with a "Cad Cat." header block (bar/pulse)
//! - [`score_table`]: a corpus-wide TSV table with time signature, measure and onset
//! - [`labels`]: remote label documents with pre-computed `start` offsets

pub mod labels;
pub mod offset_table;
pub mod score_table;

pub use labels::parse_label_document;
pub use offset_table::{parse_offset_table, parse_offset_table_bytes};
pub use score_table::{cadence_offset, parse_score_table, parse_score_table_str};
