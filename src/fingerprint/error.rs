use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a scan. Absent or forbidden files are not errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed corpus document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Invalid hash {hash:?} for {file_path} at version {version}")]
    InvalidHash {
        file_path: String,
        version: String,
        hash: String,
    },

    #[error("Duplicate version {version} for {file_path}")]
    DuplicateVersion { file_path: String, version: String },

    #[error("Corpus contains no files")]
    Empty,
}
