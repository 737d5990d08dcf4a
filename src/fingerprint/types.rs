//! Common types produced by a resolution run

use serde::Serialize;

/// Outcome of probing a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub file_path: String,
    /// MD5 of the body, present only when the server answered 200 with content
    pub observed_hash: Option<String>,
    pub http_status: u16,
}

/// Versions consistent with the evidence gathered from a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    /// Remaining candidates, in ascending version order
    pub versions: Vec<String>,
    /// True when no probed file was served at all
    pub is_empty: bool,
    pub probes: Vec<ProbeResult>,
    /// Files that were served but whose hash is unknown to the corpus
    pub unrecognized_files: Vec<String>,
}

/// Human-level reading of a `ResolutionOutcome`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No file answered 200, nothing can be said
    NoEvidence,
    /// Files answered 200 but none handed over content to hash, as with HEAD
    Unhashed,
    /// Files answered but no single version fits all of them
    NoMatch,
    Exact(String),
    Ambiguous(Vec<String>),
}

impl ResolutionOutcome {
    pub fn verdict(&self) -> Verdict {
        if self.is_empty {
            return Verdict::NoEvidence;
        }
        if self.probes.iter().all(|p| p.observed_hash.is_none()) {
            return Verdict::Unhashed;
        }

        match self.versions.as_slice() {
            [] => Verdict::NoMatch,
            [version] => Verdict::Exact(version.clone()),
            versions => Verdict::Ambiguous(versions.to_vec()),
        }
    }
}
