//! Configuration System
//!
//! Layered configuration for the novafs namespace: defaults, an optional
//! TOML file, then `NOVAFS_`-prefixed environment variables, built with the
//! `config` crate. Storage paths default under the platform data directory.

use crate::error::NamespaceError;
use crate::logging::LoggingConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovafsConfig {
    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage locations: the two record-store files and the blob directory.
///
/// Relative paths are resolved against the data directory at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory holding all persisted state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Link record store file (relative to `data_dir` unless absolute)
    #[serde(default = "default_links_file")]
    pub links_file: PathBuf,

    /// File record store file (relative to `data_dir` unless absolute)
    #[serde(default = "default_files_file")]
    pub files_file: PathBuf,

    /// Physical blob directory (relative to `data_dir` unless absolute)
    #[serde(default = "default_blobs_dir")]
    pub blobs_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "novafs")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".novafs"))
}

fn default_links_file() -> PathBuf {
    PathBuf::from("links.json")
}

fn default_files_file() -> PathBuf {
    PathBuf::from("files.json")
}

fn default_blobs_dir() -> PathBuf {
    PathBuf::from("blobs")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            links_file: default_links_file(),
            files_file: default_files_file(),
            blobs_dir: default_blobs_dir(),
        }
    }
}

impl StorageConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn links_path(&self) -> PathBuf {
        self.resolve(&self.links_file)
    }

    pub fn files_path(&self) -> PathBuf {
        self.resolve(&self.files_file)
    }

    pub fn blobs_path(&self) -> PathBuf {
        self.resolve(&self.blobs_dir)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("Data directory cannot be empty".to_string());
        }
        if self.links_file.as_os_str().is_empty() {
            return Err("Links file cannot be empty".to_string());
        }
        if self.files_file.as_os_str().is_empty() {
            return Err("Files file cannot be empty".to_string());
        }
        if self.blobs_dir.as_os_str().is_empty() {
            return Err("Blob directory cannot be empty".to_string());
        }
        Ok(())
    }
}

impl NovafsConfig {
    /// Load configuration: defaults, then `config_path` (or `novafs.toml`
    /// in the data directory if present), then `NOVAFS_*` env overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self, NamespaceError> {
        let mut builder = config::Config::builder();

        let file = config_path
            .map(Path::to_path_buf)
            .or_else(|| {
                let default = default_data_dir().join("novafs.toml");
                default.exists().then_some(default)
            });
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NOVAFS")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: NovafsConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                NamespaceError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Failed to load configuration: {e}"),
                ))
            })?;

        loaded.storage.validate().map_err(|msg| {
            NamespaceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                msg,
            ))
        })?;
        Ok(loaded)
    }
}
