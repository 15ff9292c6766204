//! Corpus loaders
//!
//! Each loader pairs a score directory scan with the annotation parser its
//! corpus needs and returns a [`CorpusResult`].

pub mod haydn_quartets;
pub mod mozart_quartets;
pub mod mozart_sonatas;
pub mod wtc_fugues;

use crate::config::CadConfig;
use crate::error::LoadResult;
use crate::fetch::LabelSource;
use crate::provision::CorpusProvisioner;
use crate::types::CorpusResult;
use std::fmt;

/// A single annotated corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corpus {
    MozartPianoSonatas,
    MozartStringQuartets,
    HaydnStringQuartets,
    BachWtcFugues,
}

impl Corpus {
    /// Short code used on the command line and in logs
    pub fn code(&self) -> &'static str {
        match self {
            Corpus::MozartPianoSonatas => "mps",
            Corpus::MozartStringQuartets => "msq",
            Corpus::HaydnStringQuartets => "hsq",
            Corpus::BachWtcFugues => "wtc",
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Collaborators shared by all loaders for one dispatch
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    pub config: &'a CadConfig,
    pub labels: &'a dyn LabelSource,
    pub provisioner: &'a dyn CorpusProvisioner,
}

/// Load one corpus
pub async fn load_corpus(ctx: LoadContext<'_>, corpus: Corpus) -> LoadResult<CorpusResult> {
    tracing::info!(corpus = %corpus, "Loading corpus");

    let result = match corpus {
        Corpus::MozartPianoSonatas => mozart_sonatas::load(ctx).await?,
        Corpus::MozartStringQuartets => mozart_quartets::load(ctx).await?,
        Corpus::HaydnStringQuartets => haydn_quartets::load(ctx.config)?,
        Corpus::BachWtcFugues => wtc_fugues::load(ctx).await?,
    };

    let unannotated = result.unannotated_pieces();
    if !unannotated.is_empty() {
        tracing::warn!(
            corpus = %corpus,
            count = unannotated.len(),
            pieces = ?unannotated,
            "Scores without annotations"
        );
    }

    tracing::info!(
        corpus = %corpus,
        scores = result.scores.len(),
        annotated = result.annotations.len(),
        cadences = result.cadence_count(),
        "Corpus loaded"
    );
    Ok(result)
}
