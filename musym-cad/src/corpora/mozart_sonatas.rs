//! Mozart piano sonatas
//!
//! MusicXML scores come from a score-sample repository and the cadence table
//! is generated by a script shipped with the annotated corpus repository.
//! Both are provisioned on demand:
//!
//! 1. `<data_root>/samples/mymusicxml_scores` is cloned when its
//!    `mozart_piano_sonatas` score directory is missing
//! 2. `<data_root>/mozart_piano_sonatas` is cloned when missing
//! 3. `mozart_loader.py -C` generates `formatted/-C_cadences.tsv` when missing

use super::LoadContext;
use crate::annotations::parse_score_table;
use crate::config::MpsAnnotations;
use crate::error::{LoadError, LoadResult};
use crate::scores::{enumerate_scores, MUSICXML_EXTENSION};
use crate::types::{AnnotationIndex, CorpusResult};
use std::path::{Path, PathBuf};

const GENERATION_SCRIPT: &str = "mozart_loader.py";
const GENERATION_ARGS: [&str; 1] = ["-C"];

/// Generated cadence table inside the corpus repository
pub fn cadence_table_path(corpus_dir: &Path) -> PathBuf {
    corpus_dir.join("formatted").join("-C_cadences.tsv")
}

pub async fn load(ctx: LoadContext<'_>) -> LoadResult<CorpusResult> {
    let config = ctx.config;

    let score_dir = config.mps_score_dir()?;
    if !score_dir.exists() {
        ctx.provisioner
            .clone_repository(config.mps_scores_repository(), &config.mps_scores_checkout()?)
            .await?;
    }
    let scores = enumerate_scores(&score_dir, MUSICXML_EXTENSION)?;

    let annotations = match config.mps.annotations {
        MpsAnnotations::Tsv => load_cadence_table(ctx).await?,
        MpsAnnotations::Disabled => {
            tracing::warn!("Mozart piano sonata annotations disabled; returning scores only");
            AnnotationIndex::new()
        }
    };

    Ok(CorpusResult::new(scores, annotations))
}

async fn load_cadence_table(ctx: LoadContext<'_>) -> LoadResult<AnnotationIndex> {
    let config = ctx.config;
    let corpus_dir = config.mps_corpus_dir()?;
    if !corpus_dir.exists() {
        ctx.provisioner
            .clone_repository(config.mps_corpus_repository(), &corpus_dir)
            .await?;
    }

    let table = cadence_table_path(&corpus_dir);
    if !table.exists() {
        ctx.provisioner
            .run_generation_script(&corpus_dir.join(GENERATION_SCRIPT), &GENERATION_ARGS, &corpus_dir)
            .await?;
        if !table.exists() {
            return Err(LoadError::Provisioning(format!(
                "{} did not produce {}",
                GENERATION_SCRIPT,
                table.display()
            )));
        }
    }

    parse_score_table(&table, config.include_type)
}
