//! Score file enumeration
//!
//! Lists one directory level (no recursion) and indexes every file with the
//! corpus extension under its stem.

use crate::error::{LoadError, LoadResult};
use crate::types::ScoreIndex;
use std::path::Path;
use walkdir::WalkDir;

/// Score file extensions used by the corpora
pub const MUSICXML_EXTENSION: &str = "musicxml";
pub const KERN_EXTENSION: &str = "krn";

/// Index score files in `dir` whose extension equals `extension`
pub fn enumerate_scores(dir: &Path, extension: &str) -> LoadResult<ScoreIndex> {
    if !dir.exists() {
        return Err(LoadError::Configuration(format!(
            "Score directory not found: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(LoadError::Configuration(format!(
            "Score path is not a directory: {}",
            dir.display()
        )));
    }

    let mut scores = ScoreIndex::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            scores.insert(stem.to_string(), path.to_path_buf());
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        extension = %extension,
        count = scores.len(),
        "Enumerated score files"
    );
    Ok(scores)
}
