//! Corpus data model
//!
//! Score and annotation indexes are ordered by piece key so that every
//! downstream consumer sees pieces in the same order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Piece identifier: the score filename without its extension
pub type PieceKey = String;

/// Piece key → score file path
pub type ScoreIndex = BTreeMap<PieceKey, PathBuf>;

/// Piece key → cadences in annotation order
pub type AnnotationIndex = BTreeMap<PieceKey, Vec<Cadence>>;

/// Where a cadence falls within a piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CadencePosition {
    /// Beat offset from the start of the piece
    Offset(f64),
    /// Bar number and zero-based beat within the bar
    BarBeat { bar: i64, beat: f64 },
}

impl CadencePosition {
    /// Offset in beats, converting bar/beat pairs with the given bar length
    pub fn to_offset(self, beats_per_bar: f64) -> f64 {
        match self {
            CadencePosition::Offset(offset) => offset,
            CadencePosition::BarBeat { bar, beat } => beats_per_bar * (bar - 1) as f64 + beat,
        }
    }
}

/// One annotated cadence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cadence {
    pub position: CadencePosition,
    /// Cadence type label (PAC, HC, ...), only set when type tagging is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Cadence {
    pub fn at(offset: f64) -> Self {
        Self {
            position: CadencePosition::Offset(offset),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// A piece whose remote annotations could not be fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub key: PieceKey,
    pub reason: String,
}

/// Scores and annotations for one corpus or a merge of several
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusResult {
    pub scores: ScoreIndex,
    pub annotations: AnnotationIndex,
    /// Pieces skipped because their annotations could not be fetched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FetchFailure>,
}

impl CorpusResult {
    pub fn new(scores: ScoreIndex, annotations: AnnotationIndex) -> Self {
        Self {
            scores,
            annotations,
            failures: Vec::new(),
        }
    }

    /// Merge two results; on key collision `other` wins (last-write-wins)
    pub fn union(mut self, other: CorpusResult) -> CorpusResult {
        self.scores.extend(other.scores);
        self.annotations.extend(other.annotations);
        self.failures.extend(other.failures);
        self
    }

    /// Pieces that have a score but no annotation entry
    pub fn unannotated_pieces(&self) -> Vec<&str> {
        self.scores
            .keys()
            .filter(|key| !self.annotations.contains_key(*key))
            .map(String::as_str)
            .collect()
    }

    /// Total number of cadences across all pieces
    pub fn cadence_count(&self) -> usize {
        self.annotations.values().map(Vec::len).sum()
    }
}
