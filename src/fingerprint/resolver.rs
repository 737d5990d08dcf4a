//! Version resolution by candidate set narrowing
//!
//! Every file that the target serves votes for the versions whose recorded
//! hash matches what was observed. The answer is the intersection of all votes.

use std::collections::HashSet;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fingerprint::corpus::ReferenceCorpus;
use crate::fingerprint::error::ProbeError;
use crate::fingerprint::hasher::{HashProvider, RemoteHash};
use crate::fingerprint::ordering::sort_versions;
use crate::fingerprint::transport::HttpVerb;
use crate::fingerprint::types::{ProbeResult, ResolutionOutcome};

/// What to do with a file that is served but whose hash the corpus does not know
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedPolicy {
    /// The file contributes no evidence
    #[default]
    Abstain,
    /// The file votes for no version, which empties the candidate set
    Exclude,
}

/// Running set of versions still consistent with the evidence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CandidateSet {
    /// No file has voted yet
    #[default]
    Unconstrained,
    Narrowed(HashSet<String>),
}

impl CandidateSet {
    /// Apply one file's vote
    ///
    /// The first vote replaces `Unconstrained`; later votes intersect. An empty
    /// narrowed set stays empty.
    pub fn narrow(&mut self, versions: HashSet<String>) {
        *self = match std::mem::take(self) {
            CandidateSet::Unconstrained => CandidateSet::Narrowed(versions),
            CandidateSet::Narrowed(current) => {
                CandidateSet::Narrowed(current.intersection(&versions).cloned().collect())
            }
        };
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, CandidateSet::Narrowed(set) if set.is_empty())
    }

    /// Remaining versions in ascending order; `Unconstrained` yields none
    pub fn into_sorted_vec(self) -> Vec<String> {
        match self {
            CandidateSet::Unconstrained => Vec::new(),
            CandidateSet::Narrowed(set) => {
                let mut versions: Vec<String> = set.into_iter().collect();
                sort_versions(&mut versions);
                versions
            }
        }
    }
}

/// Per-resolution accumulator
#[derive(Debug, Default)]
struct Evidence {
    candidates: CandidateSet,
    any_file_resolved: bool,
    probes: Vec<ProbeResult>,
    unrecognized_files: Vec<String>,
}

impl Evidence {
    fn record(
        &mut self,
        corpus: &ReferenceCorpus,
        policy: UnrecognizedPolicy,
        file_path: &str,
        hash: RemoteHash,
    ) {
        let digest = match hash {
            RemoteHash::NotFound { status } => {
                debug!("{} not served (status {}), skipping", file_path, status);
                self.probes.push(ProbeResult {
                    file_path: file_path.to_string(),
                    observed_hash: None,
                    http_status: status,
                });
                return;
            }
            RemoteHash::Present => {
                debug!("{} is served but has no content to compare, abstaining", file_path);
                self.any_file_resolved = true;
                self.probes.push(ProbeResult {
                    file_path: file_path.to_string(),
                    observed_hash: None,
                    http_status: 200,
                });
                return;
            }
            RemoteHash::Found { digest } => digest,
        };

        self.any_file_resolved = true;
        let versions = corpus.lookup_versions(file_path, &digest);

        if versions.is_empty() {
            warn!("{} has unrecognized hash {}", file_path, digest);
            self.unrecognized_files.push(file_path.to_string());
            if policy == UnrecognizedPolicy::Exclude {
                self.candidates.narrow(HashSet::new());
            }
        } else {
            debug!("{} matches {} version(s)", file_path, versions.len());
            self.candidates.narrow(versions);
        }

        if self.candidates.is_exhausted() {
            debug!("No candidate version left after {}", file_path);
        }

        self.probes.push(ProbeResult {
            file_path: file_path.to_string(),
            observed_hash: Some(digest),
            http_status: 200,
        });
    }

    fn into_outcome(self) -> ResolutionOutcome {
        ResolutionOutcome {
            versions: self.candidates.into_sorted_vec(),
            is_empty: !self.any_file_resolved,
            probes: self.probes,
            unrecognized_files: self.unrecognized_files,
        }
    }
}

/// Resolves the installed version of a target against a reference corpus
pub struct VersionResolver {
    corpus: Arc<ReferenceCorpus>,
    hasher: Arc<dyn HashProvider>,
    policy: UnrecognizedPolicy,
    concurrency: usize,
}

impl VersionResolver {
    /// Create a resolver that abstains on unrecognized files and probes one file at a time
    pub fn new(corpus: Arc<ReferenceCorpus>, hasher: Arc<dyn HashProvider>) -> Self {
        Self {
            corpus,
            hasher,
            policy: UnrecognizedPolicy::default(),
            concurrency: 1,
        }
    }

    pub fn with_policy(mut self, policy: UnrecognizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Allow up to `concurrency` probes in flight. Values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    /// Probe `candidate_file_paths` on `base_url` and narrow the version set
    ///
    /// Results are folded in input order whatever the concurrency, so the
    /// outcome does not depend on completion order. The first transport
    /// failure aborts the whole resolution and drops probes still in flight.
    pub async fn resolve_version(
        &self,
        base_url: &str,
        candidate_file_paths: &[&str],
        verb: HttpVerb,
    ) -> Result<ResolutionOutcome, ProbeError> {
        debug!(
            "Resolving {} with {} candidate files via {}",
            base_url,
            candidate_file_paths.len(),
            verb.as_str()
        );

        let evidence = stream::iter(candidate_file_paths.iter().copied())
            .map(move |file_path| async move {
                let hash = self
                    .hasher
                    .compute_remote_hash(base_url, file_path, verb)
                    .await?;
                Ok::<_, ProbeError>((file_path, hash))
            })
            .buffered(self.concurrency)
            .try_fold(Evidence::default(), move |mut evidence, (file_path, hash)| async move {
                evidence.record(&self.corpus, self.policy, file_path, hash);
                Ok(evidence)
            })
            .await?;

        let outcome = evidence.into_outcome();
        info!(
            "Resolved {}: {} candidate version(s), {} probe(s), no evidence: {}",
            base_url,
            outcome.versions.len(),
            outcome.probes.len(),
            outcome.is_empty
        );

        Ok(outcome)
    }
}
