//! Build configuration.
//!
//! Read from `hypedocs.json` in the documentation root. Every field has a
//! default matching the published Hype manual, so an empty or missing file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocsError, DocsResult};

/// Name of the configuration file inside the documentation root.
pub const CONFIG_FILE_NAME: &str = "hypedocs.json";

/// Global build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Directory (relative to the root) holding the chapter sources.
    pub chapters_dir: PathBuf,

    /// Combined output file (relative to the root).
    pub output: PathBuf,

    /// Directory (relative to the root) holding image assets.
    pub images_dir: PathBuf,

    /// Level-one heading written at the top of the combined file.
    pub title: String,

    /// Replacement prefix for links into the local `documents/` folder.
    pub documents_base_url: String,

    /// Replacement prefix for references into the local `images/` folder.
    pub images_base_url: String,

    /// URL prefix identifying hosted image references during the audit.
    pub image_host_prefix: String,

    /// Chapter replaced by a short pointer to the hosted version history.
    pub version_history: Option<VersionHistoryStub>,

    /// Whether to strip class attributes and redundant whitespace.
    pub compact: bool,

    /// File listing unused images when deletion is declined.
    pub unused_list: PathBuf,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// A chapter whose content is replaced by a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHistoryStub {
    /// Chapter file name, e.g. `15versionhistory.md`.
    pub file: String,

    /// Where the full history is hosted.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "hypedocs_manual=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            chapters_dir: PathBuf::from("md"),
            output: PathBuf::from("README.md"),
            images_dir: PathBuf::from("images"),
            title: "Tumult Hype Documentation".to_string(),
            documents_base_url: "https://tumult.com/hype/documentation/v4/documents/".to_string(),
            images_base_url:
                "https://raw.githubusercontent.com/tumult/hype-documentation/refs/heads/main/images/"
                    .to_string(),
            image_host_prefix: "https://raw.githubusercontent.com/".to_string(),
            version_history: Some(VersionHistoryStub::default()),
            compact: true,
            unused_list: PathBuf::from("unused_files.txt"),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VersionHistoryStub {
    fn default() -> Self {
        Self {
            file: "15versionhistory.md".to_string(),
            url: "https://tumult.com/hype/documentation/#version-history".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl DocsConfig {
    /// Load config from `root`, falling back to defaults.
    pub fn load(root: impl AsRef<Path>) -> Self {
        let config_path = config_file_path(root.as_ref());
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from `root`, reporting a malformed file instead of
    /// silently using defaults. A missing file still yields defaults.
    pub fn load_strict(root: impl AsRef<Path>) -> DocsResult<Self> {
        let config_path = config_file_path(root.as_ref());
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| DocsError::io_at(&config_path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| DocsError::config(format!("{}: {e}", config_path.display())))
    }

    /// Save config into `root`.
    pub fn save(&self, root: impl AsRef<Path>) -> DocsResult<PathBuf> {
        let config_path = config_file_path(root.as_ref());
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsError::io_at(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json).map_err(|e| DocsError::io_at(&config_path, e))?;
        Ok(config_path)
    }

    /// Chapter directory resolved against `root`.
    pub fn chapters_path(&self, root: &Path) -> PathBuf {
        root.join(&self.chapters_dir)
    }

    /// Output file resolved against `root`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }

    /// Image directory resolved against `root`.
    pub fn images_path(&self, root: &Path) -> PathBuf {
        root.join(&self.images_dir)
    }

    /// Output file name, used to keep it out of the chapter list.
    pub fn output_file_name(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "README.md".to_string())
    }
}

/// Config file location for a documentation root.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}
