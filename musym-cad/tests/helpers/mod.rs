//! Test Helper Utilities
//!
//! In-memory collaborators and fixture corpora for musym-cad tests

use async_trait::async_trait;
use musym_cad::config::CadConfig;
use musym_cad::fetch::{LabelSource, SourceError};
use musym_cad::provision::CorpusProvisioner;
use musym_cad::{Dispatcher, LoadError, LoadResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const MSQ_BASE: &str = "http://labels.test/mozart/";
pub const WTC_BASE: &str = "http://labels.test/fugues/";

pub const SONATA_TABLE: &str = "\
filename\tmc\tonset\ttimesig\tcadence
K279-1\t5\t1/2\t3/4\tPAC
K279-1\t13\t0\t3/4\tHC
K280-2\t2\t0\t6/8\tIAC
";

/// Label documents served by URL; unknown URLs are 404s
#[derive(Default)]
pub struct MockLabelSource {
    documents: HashMap<String, Result<String, u16>>,
    requests: Arc<AtomicUsize>,
}

impl MockLabelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.documents.insert(url.to_string(), Err(status));
        self
    }

    /// Shared counter of requests made, readable after the source is boxed
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl LabelSource for MockLabelSource {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.documents.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(SourceError::HttpError(*status, url.to_string())),
            None => Err(SourceError::NotFound(url.to_string())),
        }
    }
}

/// Provisioner that records calls and creates fixture files instead of
/// cloning or running scripts
#[derive(Default)]
pub struct FixtureProvisioner {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl FixtureProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl CorpusProvisioner for FixtureProvisioner {
    async fn clone_repository(&self, url: &str, destination: &Path) -> LoadResult<()> {
        self.calls.lock().unwrap().push(format!("clone {}", url));
        if self.fail {
            return Err(LoadError::Provisioning(format!("clone of {} failed", url)));
        }

        fs::create_dir_all(destination).unwrap();
        if url.contains("mymusicxml_scores") {
            let sonatas = destination.join("mozart_piano_sonatas");
            fs::create_dir_all(&sonatas).unwrap();
            for key in ["K279-1", "K280-2"] {
                fs::write(sonatas.join(format!("{}.musicxml", key)), b"<score-partwise/>").unwrap();
            }
        }
        Ok(())
    }

    async fn run_generation_script(&self, script: &Path, args: &[&str], working_dir: &Path) -> LoadResult<()> {
        let name = script.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(format!("run {} {}", name, args.join(" ")));
        if self.fail {
            return Err(LoadError::Provisioning(format!("{} failed", name)));
        }

        let formatted = working_dir.join("formatted");
        fs::create_dir_all(&formatted).unwrap();
        fs::write(formatted.join("-C_cadences.tsv"), SONATA_TABLE).unwrap();
        Ok(())
    }
}

/// Configuration rooted at `data_root` with the mock base URLs
pub fn test_config(data_root: &Path) -> CadConfig {
    let mut config = CadConfig::default();
    config.data_root = Some(data_root.to_path_buf());
    config.msq.base_url = Some(MSQ_BASE.to_string());
    config.wtc.base_url = Some(WTC_BASE.to_string());
    config
}

pub fn dispatcher(config: CadConfig, labels: MockLabelSource, provisioner: FixtureProvisioner) -> Dispatcher {
    Dispatcher::new(config, Box::new(labels), Box::new(provisioner))
}

pub fn label_document(starts: &[f64]) -> String {
    let labels: Vec<String> = starts
        .iter()
        .map(|s| format!("{{\"type\": \"Cadence\", \"start\": {}, \"tag\": \"PAC\"}}", s))
        .collect();
    format!("{{\"labels\": [{}, {{\"type\": \"Pedal\", \"start\": 1}}]}}", labels.join(", "))
}

/// `<root>/mozart_string_quartets/kern/<key>.krn`
pub fn write_mozart_quartets(root: &Path, keys: &[&str]) {
    let dir = root.join("mozart_string_quartets").join("kern");
    fs::create_dir_all(&dir).unwrap();
    for key in keys {
        fs::write(dir.join(format!("{}.krn", key)), b"**kern\n").unwrap();
    }
}

/// `<root>/wtc-fugues/<key>.krn`
pub fn write_wtc_fugues(root: &Path, keys: &[&str]) {
    let dir = root.join("wtc-fugues");
    fs::create_dir_all(&dir).unwrap();
    for key in keys {
        fs::write(dir.join(format!("{}.krn", key)), b"**kern\n").unwrap();
    }
}

/// Haydn corpus with one cadence table per key: `(key, [(bar, pulse)])`
pub fn write_haydn_quartets(root: &Path, pieces: &[(&str, &[(i64, f64)])]) {
    let corpus = root.join("haydn_string_quartets");
    let kern = corpus.join("kern");
    let annotations = corpus.join("annotations").join("cadences_keys");
    fs::create_dir_all(&kern).unwrap();
    fs::create_dir_all(&annotations).unwrap();

    for (key, cadences) in pieces {
        fs::write(kern.join(format!("{}.krn", key)), b"**kern\n").unwrap();

        let mut table = String::from("Descriptive Information,Value,,\nComposer,Haydn,,\nCad Cat.,Bar #,Pulse #,\n");
        for (bar, pulse) in cadences.iter() {
            table.push_str(&format!("PAC,{},{},\n,,,\n", bar, pulse));
        }
        fs::write(annotations.join(format!("{}.csv", key)), table).unwrap();
    }
}

/// Mozart sonata scores and cadence table already on disk
pub fn write_mozart_sonatas(root: &Path) {
    let scores = root.join("samples").join("mymusicxml_scores").join("mozart_piano_sonatas");
    fs::create_dir_all(&scores).unwrap();
    for key in ["K279-1", "K280-2"] {
        fs::write(scores.join(format!("{}.musicxml", key)), b"<score-partwise/>").unwrap();
    }

    let formatted = root.join("mozart_piano_sonatas").join("formatted");
    fs::create_dir_all(&formatted).unwrap();
    fs::write(formatted.join("-C_cadences.tsv"), SONATA_TABLE).unwrap();
}
