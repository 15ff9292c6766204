//! Error types for musym-cad

use crate::types::{FetchFailure, PieceKey};
use std::path::PathBuf;
use thiserror::Error;

/// Corpus loading error
#[derive(Debug, Error)]
pub enum LoadError {
    /// Unsupported source name, missing directory or invalid setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Annotation source does not have the expected layout
    #[error("Annotation format error in {source_name}: {reason}")]
    AnnotationFormat { source_name: String, reason: String },

    /// Cloning a corpus or generating its annotation table failed
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Remote annotations for one piece could not be fetched
    #[error("Fetch error for {key}: {reason}")]
    Fetch { key: PieceKey, reason: String },

    /// Remote annotations for several pieces could not be fetched
    #[error("Fetch failed for {} piece(s): {}", .0.len(), failed_keys(.0))]
    FetchBatch(Vec<FetchFailure>),

    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// musym-common error
    #[error("Common error: {0}")]
    Common(#[from] musym_common::Error),
}

impl LoadError {
    pub fn format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::AnnotationFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

fn failed_keys(failures: &[FetchFailure]) -> String {
    failures
        .iter()
        .map(|f| f.key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for corpus loading
pub type LoadResult<T> = Result<T, LoadError>;
