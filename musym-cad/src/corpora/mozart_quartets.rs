//! Mozart string quartets
//!
//! Kern scores on disk, cadence labels fetched per piece from the algomus
//! archive.

use super::LoadContext;
use crate::error::LoadResult;
use crate::fetch::{fetch_labels, LabelRequest};
use crate::scores::{enumerate_scores, KERN_EXTENSION};
use crate::types::CorpusResult;

/// Remote label file name for a score key
///
/// `k080-01` → `k80.1-ref.dez`: every "k0" becomes "k", then every "-0"
/// becomes ".".
pub fn remote_file_name(key: &str) -> String {
    let stem = key.replace("k0", "k").replace("-0", ".");
    format!("{}-ref.dez", stem)
}

pub async fn load(ctx: LoadContext<'_>) -> LoadResult<CorpusResult> {
    let config = ctx.config;
    let scores = enumerate_scores(&config.msq_score_dir()?, KERN_EXTENSION)?;
    let base_url = config.msq_base_url();

    let (annotations, failures) = fetch_labels(
        ctx.labels,
        scores.keys().cloned().collect(),
        |key| Ok(LabelRequest::new(base_url, remote_file_name(key))),
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
