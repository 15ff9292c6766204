//! musym-cad library interface
//!
//! Loads musical scores and cadence annotations from the supported corpora
//! for the cadence detection pipeline.

pub mod annotations;
pub mod config;
pub mod corpora;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod provision;
pub mod scores;
pub mod types;

pub use crate::config::{CadConfig, FetchPolicy};
pub use crate::dispatch::{Dispatcher, Source};
pub use crate::error::{LoadError, LoadResult};
pub use crate::types::{AnnotationIndex, Cadence, CadencePosition, CorpusResult, ScoreIndex};
