//! Haydn string quartets
//!
//! Layout under the corpus root:
//! - `kern/<key>.krn`: scores
//! - `annotations/cadences_keys/<key>.csv`: one cadence table per score,
//!   whose category column gives the cadence type

use crate::annotations::parse_offset_table;
use crate::config::CadConfig;
use crate::error::LoadResult;
use crate::scores::{enumerate_scores, KERN_EXTENSION};
use crate::types::{AnnotationIndex, CadencePosition, CorpusResult};
use std::path::{Path, PathBuf};

pub fn score_dir(root: &Path) -> PathBuf {
    root.join("kern")
}

pub fn annotation_dir(root: &Path) -> PathBuf {
    root.join("annotations").join("cadences_keys")
}

pub fn load(config: &CadConfig) -> LoadResult<CorpusResult> {
    let root = config.hsq_root_dir()?;
    let scores = enumerate_scores(&score_dir(&root), KERN_EXTENSION)?;
    let annotation_dir = annotation_dir(&root);

    let mut annotations = AnnotationIndex::new();
    for key in scores.keys() {
        let table = annotation_dir.join(format!("{}.csv", key));
        let mut cadences = parse_offset_table(&table, config.include_type)?;
        if let Some(beats_per_bar) = config.hsq.beats_per_bar {
            for cadence in &mut cadences {
                cadence.position = CadencePosition::Offset(cadence.position.to_offset(beats_per_bar));
            }
        }
        annotations.insert(key.clone(), cadences);
    }

    Ok(CorpusResult::new(scores, annotations))
}
