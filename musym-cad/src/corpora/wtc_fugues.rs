//! Bach Well-Tempered Clavier, book I fugues
//!
//! Kern scores on disk, cadence labels fetched per piece. Remote files are
//! named after the fugue number and its BWV number (BWV 846 is fugue 1).

use super::LoadContext;
use crate::error::{LoadError, LoadResult};
use crate::fetch::{fetch_labels, LabelRequest};
use crate::scores::{enumerate_scores, KERN_EXTENSION};
use crate::types::CorpusResult;

const BWV_OFFSET: u32 = 845;

/// Remote label file name for a score key
///
/// The last two characters of the key are the fugue number:
/// `wtc1f01` → `01-bwv846-ref.dez`.
pub fn remote_file_name(key: &str) -> LoadResult<String> {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 2 {
        return Err(LoadError::format(key, "key too short to carry a fugue number"));
    }
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    if !suffix.chars().all(|c| c.is_ascii_digit()) {
        return Err(LoadError::format(key, format!("fugue number '{}' is not numeric", suffix)));
    }
    let fugue: u32 = suffix
        .parse()
        .map_err(|_| LoadError::format(key, format!("fugue number '{}' is not numeric", suffix)))?;

    Ok(format!("{}-bwv{}-ref.dez", suffix, BWV_OFFSET + fugue))
}

pub async fn load(ctx: LoadContext<'_>) -> LoadResult<CorpusResult> {
    let config = ctx.config;
    let scores = enumerate_scores(&config.wtc_score_dir()?, KERN_EXTENSION)?;
    let base_url = config.wtc_base_url();

    let (annotations, failures) = fetch_labels(
        ctx.labels,
        scores.keys().cloned().collect(),
        |key| Ok(LabelRequest::new(base_url, remote_file_name(key)?)),
        &config.fetch,
        config.include_type,
    )
    .await?;

    Ok(CorpusResult {
        scores,
        annotations,
        failures,
    })
}
