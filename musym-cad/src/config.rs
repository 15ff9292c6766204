//! Configuration for musym-cad
//!
//! Loaded once from TOML (see `musym_common::config` for file resolution),
//! then overridden by command-line arguments before any corpus is loaded.
//! The resulting [`CadConfig`] is shared by reference and never mutated.
//!
//! Corpus directories default to fixed subdirectories of `data_root`:
//!
//! ```toml
//! data_root = "/data/corpora"
//! include_type = false
//!
//! [fetch]
//! timeout_secs = 30
//! concurrency = 4
//! policy = "skip"
//!
//! [msq]
//! score_dir = "/data/corpora/mozart_string_quartets/kern"
//!
//! [hsq]
//! beats_per_bar = 4
//! ```

use crate::error::{LoadError, LoadResult};
use musym_common::logging::LoggingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "MUSYM_CONFIG";
pub const CONFIG_FILE_NAME: &str = "musym-cad.toml";

pub const MSQ_BASE_URL: &str = "https://gitlab.com/algomus.fr/algomus-data/-/raw/master/quartets/mozart/";
pub const WTC_BASE_URL: &str = "https://gitlab.com/algomus.fr/algomus-data/-/raw/master/fugues/bach-wtc-i/";
pub const MPS_SCORES_REPOSITORY: &str = "https://github.com/melkisedeath/mymusicxml_scores";
pub const MPS_CORPUS_REPOSITORY: &str = "https://github.com/DCMLab/mozart_piano_sonatas.git";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CadConfig {
    /// Parent directory of all corpora
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    /// Pair each cadence with its type label
    #[serde(default)]
    pub include_type: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub provision: ProvisionConfig,

    #[serde(default)]
    pub mps: MpsConfig,

    #[serde(default)]
    pub msq: RemoteCorpusConfig,

    #[serde(default)]
    pub hsq: HsqConfig,

    #[serde(default)]
    pub wtc: RemoteCorpusConfig,
}

/// What to do when remote annotations for a piece cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchPolicy {
    /// Abort the corpus load on the first failure
    Abort,
    /// Omit the piece, log a warning and record the failure in the result
    #[default]
    Skip,
    /// Fetch every piece, then fail with the full list of failures
    Defer,
}

/// Remote label fetching
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of label requests in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub policy: FetchPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            policy: FetchPolicy::default(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External commands used to provision missing corpora
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            python: default_python(),
        }
    }
}

/// Source of Mozart piano sonata annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpsAnnotations {
    /// Parse the generated cadence TSV table
    #[default]
    Tsv,
    /// Load scores only, with an empty annotation index
    #[serde(rename = "none")]
    Disabled,
}

/// Mozart piano sonatas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MpsConfig {
    #[serde(default)]
    pub annotations: MpsAnnotations,

    #[serde(default)]
    pub scores_repository: Option<String>,

    #[serde(default)]
    pub corpus_repository: Option<String>,
}

/// Corpus whose annotations are fetched per piece
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCorpusConfig {
    #[serde(default)]
    pub score_dir: Option<PathBuf>,

    #[serde(default)]
    pub base_url: Option<String>,
}

/// Haydn string quartets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HsqConfig {
    /// Corpus root containing `kern/` and `annotations/cadences_keys/`
    #[serde(default)]
    pub root_dir: Option<PathBuf>,

    /// Converts (bar, beat) positions into beat offsets when set
    #[serde(default)]
    pub beats_per_bar: Option<f64>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    4
}

fn default_git() -> String {
    "git".to_string()
}

fn default_python() -> String {
    "python".to_string()
}

impl CadConfig {
    /// Load configuration from the resolved TOML file, or defaults
    ///
    /// Not validated here: command-line overrides are applied first, then
    /// [`CadConfig::validate`] runs on the final values.
    pub fn load(path: Option<&Path>) -> LoadResult<Self> {
        Ok(musym_common::config::load_toml_or_default(path)?)
    }

    /// Reject values that cannot work at load time
    pub fn validate(&self) -> LoadResult<()> {
        if self.fetch.concurrency == 0 {
            return Err(LoadError::Configuration("fetch.concurrency must be at least 1".to_string()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(LoadError::Configuration("fetch.timeout_secs must be at least 1".to_string()));
        }
        if let Some(beats) = self.hsq.beats_per_bar {
            if beats.is_nan() || beats <= 0.0 {
                return Err(LoadError::Configuration(format!(
                    "hsq.beats_per_bar must be positive, got {}",
                    beats
                )));
            }
        }
        Ok(())
    }

    fn data_root(&self, setting: &str) -> LoadResult<&Path> {
        self.data_root.as_deref().ok_or_else(|| {
            LoadError::Configuration(format!("neither {} nor data_root is configured", setting))
        })
    }

    /// `<data_root>/samples/mymusicxml_scores`
    pub fn mps_scores_checkout(&self) -> LoadResult<PathBuf> {
        Ok(self.data_root("mps")?.join("samples").join("mymusicxml_scores"))
    }

    /// `<data_root>/samples/mymusicxml_scores/mozart_piano_sonatas`
    pub fn mps_score_dir(&self) -> LoadResult<PathBuf> {
        Ok(self.mps_scores_checkout()?.join("mozart_piano_sonatas"))
    }

    /// `<data_root>/mozart_piano_sonatas`
    pub fn mps_corpus_dir(&self) -> LoadResult<PathBuf> {
        Ok(self.data_root("mps")?.join("mozart_piano_sonatas"))
    }

    pub fn mps_scores_repository(&self) -> &str {
        self.mps.scores_repository.as_deref().unwrap_or(MPS_SCORES_REPOSITORY)
    }

    pub fn mps_corpus_repository(&self) -> &str {
        self.mps.corpus_repository.as_deref().unwrap_or(MPS_CORPUS_REPOSITORY)
    }

    pub fn msq_score_dir(&self) -> LoadResult<PathBuf> {
        match &self.msq.score_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_root("msq.score_dir")?.join("mozart_string_quartets").join("kern")),
        }
    }

    pub fn msq_base_url(&self) -> &str {
        self.msq.base_url.as_deref().unwrap_or(MSQ_BASE_URL)
    }

    pub fn hsq_root_dir(&self) -> LoadResult<PathBuf> {
        match &self.hsq.root_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_root("hsq.root_dir")?.join("haydn_string_quartets")),
        }
    }

    pub fn wtc_score_dir(&self) -> LoadResult<PathBuf> {
        match &self.wtc.score_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_root("wtc.score_dir")?.join("wtc-fugues")),
        }
    }

    pub fn wtc_base_url(&self) -> &str {
        self.wtc.base_url.as_deref().unwrap_or(WTC_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: CadConfig = toml::from_str("").unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.concurrency, 4);
        assert_eq!(config.fetch.policy, FetchPolicy::Skip);
        assert_eq!(config.mps.annotations, MpsAnnotations::Tsv);
        assert_eq!(config.provision.git, "git");
        assert_eq!(config.logging.level, "info");
        assert!(!config.include_type);
    }

    #[test]
    fn test_paths_derive_from_data_root() {
        let config: CadConfig = toml::from_str("data_root = \"/corpora\"").unwrap();
        assert_eq!(
            config.msq_score_dir().unwrap(),
            PathBuf::from("/corpora/mozart_string_quartets/kern")
        );
        assert_eq!(config.hsq_root_dir().unwrap(), PathBuf::from("/corpora/haydn_string_quartets"));
        assert_eq!(config.wtc_score_dir().unwrap(), PathBuf::from("/corpora/wtc-fugues"));
        assert_eq!(
            config.mps_score_dir().unwrap(),
            PathBuf::from("/corpora/samples/mymusicxml_scores/mozart_piano_sonatas")
        );
    }

    #[test]
    fn test_explicit_dir_overrides_data_root() {
        let config: CadConfig = toml::from_str(
            r#"
            data_root = "/corpora"
            [wtc]
            score_dir = "/elsewhere/fugues"
            base_url = "http://localhost/fugues/"
            "#,
        )
        .unwrap();
        assert_eq!(config.wtc_score_dir().unwrap(), PathBuf::from("/elsewhere/fugues"));
        assert_eq!(config.wtc_base_url(), "http://localhost/fugues/");
        assert_eq!(config.msq_base_url(), MSQ_BASE_URL);
    }

    #[test]
    fn test_missing_data_root_is_configuration_error() {
        let config = CadConfig::default();
        match config.hsq_root_dir().unwrap_err() {
            LoadError::Configuration(msg) => assert!(msg.contains("hsq.root_dir")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_and_mps_annotations_parse() {
        let config: CadConfig = toml::from_str(
            r#"
            [fetch]
            policy = "defer"
            [mps]
            annotations = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.policy, FetchPolicy::Defer);
        assert_eq!(config.mps.annotations, MpsAnnotations::Disabled);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = CadConfig::default();
        config.fetch.concurrency = 0;
        assert!(matches!(config.validate(), Err(LoadError::Configuration(_))));
    }
}
