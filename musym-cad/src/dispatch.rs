//! Source dispatch
//!
//! Resolves a requested source name into the corpora it covers, loads them
//! in order and merges the results. Merging is last-write-wins on piece key,
//! so the order of [`Source::corpora`] matters.

use crate::config::CadConfig;
use crate::corpora::{load_corpus, Corpus, LoadContext};
use crate::error::{LoadError, LoadResult};
use crate::fetch::{HttpLabelSource, LabelSource};
use crate::provision::{CorpusProvisioner, ProcessProvisioner};
use crate::types::CorpusResult;
use std::fmt;
use std::str::FromStr;

/// A loadable source: one corpus or a fixed combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Single(Corpus),
    /// Mozart string quartets and piano sonatas
    Mozart,
    /// Mozart and Haydn string quartets
    Quartets,
    /// Mozart piano sonatas and Bach fugues
    Piano,
    /// Quartets and piano
    Mix,
}

impl Source {
    /// Corpora in merge order; later entries win on key collision
    pub fn corpora(&self) -> Vec<Corpus> {
        match self {
            Source::Single(corpus) => vec![*corpus],
            Source::Mozart => vec![Corpus::MozartStringQuartets, Corpus::MozartPianoSonatas],
            Source::Quartets => vec![Corpus::MozartStringQuartets, Corpus::HaydnStringQuartets],
            Source::Piano => vec![Corpus::MozartPianoSonatas, Corpus::BachWtcFugues],
            Source::Mix => {
                let mut corpora = Source::Quartets.corpora();
                corpora.extend(Source::Piano.corpora());
                corpora
            }
        }
    }
}

impl FromStr for Source {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = match s.trim().to_lowercase().as_str() {
            "msq" | "mozart string quartets" => Source::Single(Corpus::MozartStringQuartets),
            "mps" | "mozart piano sonatas" => Source::Single(Corpus::MozartPianoSonatas),
            "hsq" | "haydn string quartets" => Source::Single(Corpus::HaydnStringQuartets),
            "wtc" | "bach wtc" => Source::Single(Corpus::BachWtcFugues),
            "mozart" => Source::Mozart,
            "quartets" => Source::Quartets,
            "piano" => Source::Piano,
            "mix" => Source::Mix,
            _ => {
                return Err(LoadError::Configuration(format!(
                    "The specified source '{}' does not exist",
                    s
                )))
            }
        };
        Ok(source)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Single(corpus) => write!(f, "{}", corpus),
            Source::Mozart => f.write_str("mozart"),
            Source::Quartets => f.write_str("quartets"),
            Source::Piano => f.write_str("piano"),
            Source::Mix => f.write_str("mix"),
        }
    }
}

/// Loads sources with a fixed configuration and collaborators
pub struct Dispatcher {
    config: CadConfig,
    labels: Box<dyn LabelSource>,
    provisioner: Box<dyn CorpusProvisioner>,
}

impl Dispatcher {
    pub fn new(
        config: CadConfig,
        labels: Box<dyn LabelSource>,
        provisioner: Box<dyn CorpusProvisioner>,
    ) -> Self {
        Self {
            config,
            labels,
            provisioner,
        }
    }

    /// Dispatcher with the HTTP label source and process provisioner
    pub fn from_config(config: CadConfig) -> LoadResult<Self> {
        let labels = HttpLabelSource::new(&config.fetch)?;
        let provisioner = ProcessProvisioner::new(&config.provision);
        Ok(Self::new(config, Box::new(labels), Box::new(provisioner)))
    }

    pub fn config(&self) -> &CadConfig {
        &self.config
    }

    /// Resolve `source_name` and load it
    pub async fn load(&self, source_name: &str) -> LoadResult<CorpusResult> {
        let source: Source = source_name.parse()?;
        self.load_source(source).await
    }

    pub async fn load_source(&self, source: Source) -> LoadResult<CorpusResult> {
        let ctx = LoadContext {
            config: &self.config,
            labels: self.labels.as_ref(),
            provisioner: self.provisioner.as_ref(),
        };

        let mut merged = CorpusResult::default();
        for corpus in source.corpora() {
            let result = load_corpus(ctx, corpus).await?;
            merged = merged.union(result);
        }

        tracing::info!(
            source = %source,
            scores = merged.scores.len(),
            cadences = merged.cadence_count(),
            failures = merged.failures.len(),
            "Source loaded"
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(
            "Mozart String Quartets".parse::<Source>().unwrap(),
            Source::Single(Corpus::MozartStringQuartets)
        );
        assert_eq!(" mps ".parse::<Source>().unwrap(), Source::Single(Corpus::MozartPianoSonatas));
        assert_eq!("hsq".parse::<Source>().unwrap(), Source::Single(Corpus::HaydnStringQuartets));
        assert_eq!("wtc".parse::<Source>().unwrap(), Source::Single(Corpus::BachWtcFugues));
    }

    #[test]
    fn test_unknown_source_is_configuration_error() {
        match "nonexistent".parse::<Source>().unwrap_err() {
            LoadError::Configuration(msg) => assert!(msg.contains("nonexistent")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_composite_order() {
        assert_eq!(
            Source::Mozart.corpora(),
            vec![Corpus::MozartStringQuartets, Corpus::MozartPianoSonatas]
        );
        assert_eq!(
            Source::Mix.corpora(),
            vec![
                Corpus::MozartStringQuartets,
                Corpus::HaydnStringQuartets,
                Corpus::MozartPianoSonatas,
                Corpus::BachWtcFugues,
            ]
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for source in [Source::Mix, Source::Piano, Source::Single(Corpus::BachWtcFugues)] {
            assert_eq!(source.to_string().parse::<Source>().unwrap(), source);
        }
    }
}
