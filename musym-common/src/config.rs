//! Configuration file resolution and TOML loading
//!
//! Config file lookup follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config directory (`~/.config/musym/<file>` on Linux)
//! 4. System config directory (`/etc/musym/<file>`, Linux only)
//!
//! When none of these yields an existing file, callers fall back to
//! compiled defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Resolve the configuration file path for a tool
///
/// A path given on the command line or through the environment variable is
/// returned even if it does not exist, so that the subsequent load reports
/// the missing file instead of silently using defaults.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    file_name: &str,
) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config directory
    if let Some(path) = dirs::config_dir().map(|d| d.join("musym").join(file_name)) {
        if path.exists() {
            return Some(path);
        }
    }

    // Priority 4: System config directory
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/musym").join(file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load a TOML file if a path was resolved, otherwise use defaults
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            load_toml(path)
        }
        None => Ok(T::default()),
    }
}
