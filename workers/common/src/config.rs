//! Access to configuration files shared by all workers.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file '{0}' does not exist")]
    NotFound(PathBuf),
    #[error("failed to parse '{0}': {1}")]
    Parse(PathBuf, serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read a YAML (or JSON) configuration file below `root`.
///
/// An explicitly given `path` must exist. Without one, `default_path` is tried and `fallback` is
/// returned if it doesn't exist either.
pub async fn read_config_file_value_with_default<T: DeserializeOwned>(
    root: &Path,
    path: Option<&str>,
    default_path: &str,
    fallback: T,
) -> Result<T, ConfigError> {
    let file = match path {
        Some(path) => {
            let file = root.join(path);
            if !file.is_file() {
                return Err(ConfigError::NotFound(file));
            }
            file
        }
        None => {
            let file = root.join(default_path);
            if !file.is_file() {
                log::debug!(
                    "Default configuration file '{}' not found, using fallback",
                    file.display()
                );
                return Ok(fallback);
            }
            file
        }
    };

    let content = tokio::fs::read_to_string(&file).await?;
    serde_yaml::from_str(&content).map_err(|err| ConfigError::Parse(file, err))
}
