//! Converter configuration, loaded from a JSON file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pptpdf.json";

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "conversion.log";

/// Default per-file conversion timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Top-level configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log destination. `None` logs to stderr.
    pub log_file: Option<PathBuf>,

    /// Replace existing PDFs by default.
    pub overwrite: bool,

    /// Extensions picked up by batch conversion.
    pub extensions: Vec<String>,

    /// LibreOffice settings.
    pub soffice: SofficeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            overwrite: false,
            extensions: vec!["pptx".to_string()],
            soffice: SofficeConfig::default(),
        }
    }
}

/// Settings for locating and running LibreOffice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SofficeConfig {
    /// Explicit path to the `soffice` program.
    pub program: Option<PathBuf>,

    /// Seconds to wait for a single conversion before killing it.
    pub timeout_secs: u64,
}

impl Default for SofficeConfig {
    fn default() -> Self {
        Self {
            program: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::debug!("Using configuration from {}", fallback.display());
            return Self::from_file(fallback);
        }

        Ok(Self::default())
    }
}
