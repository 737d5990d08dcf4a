use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fingerprint::resolver::UnrecognizedPolicy;
use crate::fingerprint::transport::HttpVerb;

// =============================================================================
// Defaults
// =============================================================================

/// Timeout for a single probe in milliseconds (15 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// User agent sent with every probe
pub const DEFAULT_USER_AGENT: &str = concat!("cms-fingerprint/", env!("CARGO_PKG_VERSION"));

/// Number of probes allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 1;

const APP_DIR: &str = "cms-fingerprint";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scan configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    pub http: HttpConfig,
    pub resolver: ResolverConfig,
    /// Directory holding `<cms>/versions.xml` corpora
    pub corpus_dir: Option<PathBuf>,
}

/// Transport-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub verb: HttpVerb,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verb: HttpVerb::Get,
        }
    }
}

/// Resolution-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub concurrency: usize,
    pub unrecognized_policy: UnrecognizedPolicy,
    /// Probe only the N most discriminating files instead of every known file
    pub max_files: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            unrecognized_policy: UnrecognizedPolicy::default(),
            max_files: None,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load `path` if given, else the default config file if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Corpus directory from the config, or the default data directory
    pub fn corpus_dir(&self) -> PathBuf {
        self.corpus_dir.clone().unwrap_or_else(data_dir)
    }
}

/// Returns the path to the data directory for cms-fingerprint.
/// Uses $XDG_DATA_HOME/cms-fingerprint if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/cms-fingerprint,
/// or ./cms-fingerprint if neither is available.
pub fn data_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
    .join("config.json")
}

fn dir_with_env(xdg_dir: Option<String>, home_dir: Option<PathBuf>, home_relative: &str) -> PathBuf {
    let base = xdg_dir
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_DIR)
}
