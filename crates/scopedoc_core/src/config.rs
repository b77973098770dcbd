//! Editor configuration loaded from an optional JSON file.
//!
//! # Invariants
//! - Every field has a default; an absent file yields `EditorConfig::default()`.
//! - A present but unreadable or malformed file is an error, never silently
//!   replaced by defaults.

use crate::autosave::DEFAULT_AUTOSAVE_INTERVAL_MS;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default lifetime of transient notifications.
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 3_000;
/// Default SQLite file name inside the data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "scopedoc.sqlite3";

/// Tunables for the editor and its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub autosave_interval_ms: u64,
    pub notification_duration_ms: u64,
    pub log_level: String,
    pub db_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            log_level: default_log_level().to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Database path for `data_dir`.
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_file_name)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Loads configuration from `path`.
///
/// # Errors
/// - `Io` when the file exists but cannot be read.
/// - `Parse` when the file is not a valid config object.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(EditorConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
