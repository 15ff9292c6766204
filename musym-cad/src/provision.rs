//! Corpus provisioning
//!
//! Some corpora are fetched on demand: a repository is cloned when its
//! directory is missing, and a generation script builds a derived
//! annotation table when it is missing. Loaders only talk to the
//! [`CorpusProvisioner`] trait, never to the OS directly.

use crate::config::ProvisionConfig;
use crate::error::{LoadError, LoadResult};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Side effects needed to establish a corpus on disk
#[async_trait]
pub trait CorpusProvisioner: Send + Sync {
    /// Clone `url` into `destination`
    async fn clone_repository(&self, url: &str, destination: &Path) -> LoadResult<()>;

    /// Run `script` with `args` from `working_dir`
    async fn run_generation_script(&self, script: &Path, args: &[&str], working_dir: &Path) -> LoadResult<()>;
}

/// Provisioner running `git` and `python` as child processes
pub struct ProcessProvisioner {
    git: String,
    python: String,
}

impl ProcessProvisioner {
    pub fn new(config: &ProvisionConfig) -> Self {
        Self {
            git: config.git.clone(),
            python: config.python.clone(),
        }
    }
}

#[async_trait]
impl CorpusProvisioner for ProcessProvisioner {
    async fn clone_repository(&self, url: &str, destination: &Path) -> LoadResult<()> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LoadError::io(parent, e))?;
        }

        tracing::info!(url = %url, destination = %destination.display(), "Cloning corpus repository");

        let mut command = Command::new(&self.git);
        command.arg("clone").arg(url).arg(destination);
        run(command, &format!("{} clone {}", self.git, url)).await
    }

    async fn run_generation_script(&self, script: &Path, args: &[&str], working_dir: &Path) -> LoadResult<()> {
        tracing::info!(
            script = %script.display(),
            args = ?args,
            working_dir = %working_dir.display(),
            "Running annotation generation script"
        );

        let mut command = Command::new(&self.python);
        command.arg(script).args(args).current_dir(working_dir);
        run(command, &format!("{} {}", self.python, script.display())).await
    }
}

async fn run(mut command: Command, description: &str) -> LoadResult<()> {
    let output = command
        .output()
        .await
        .map_err(|e| LoadError::Provisioning(format!("Failed to execute {}: {}", description, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LoadError::Provisioning(format!(
            "{} exited with {}: {}",
            description,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

/// Provisioner that refuses every side effect
///
/// Used when the caller requires corpora to already be on disk.
pub struct OfflineProvisioner;

#[async_trait]
impl CorpusProvisioner for OfflineProvisioner {
    async fn clone_repository(&self, url: &str, destination: &Path) -> LoadResult<()> {
        Err(LoadError::Provisioning(format!(
            "provisioning disabled: {} is missing (would clone {})",
            destination.display(),
            url
        )))
    }

    async fn run_generation_script(&self, script: &Path, _args: &[&str], _working_dir: &Path) -> LoadResult<()> {
        Err(LoadError::Provisioning(format!(
            "provisioning disabled: would run {}",
            script.display()
        )))
    }
}
