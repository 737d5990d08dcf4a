//! Scan orchestration
//!
//! Ties a CMS plugin, its corpus and the shared probing components together
//! and runs one scan against one target.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cms::plugin::CmsPlugin;
use crate::config::ResolverConfig;
use crate::fingerprint::changelog::{ChangelogProbe, Warner};
use crate::fingerprint::corpus::ReferenceCorpus;
use crate::fingerprint::error::ProbeError;
use crate::fingerprint::hasher::Md5HashProvider;
use crate::fingerprint::resolver::VersionResolver;
use crate::fingerprint::transport::{HttpVerb, Transport};
use crate::fingerprint::types::ResolutionOutcome;

/// Everything learned about a target in one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub cms: String,
    pub url: String,
    pub verb: HttpVerb,
    pub changelog_exposed: bool,
    pub outcome: ResolutionOutcome,
}

pub struct Scanner {
    plugin: Arc<dyn CmsPlugin>,
    resolver: VersionResolver,
    changelog: ChangelogProbe,
    max_files: Option<usize>,
}

impl Scanner {
    /// Build a scanner for `plugin` using an already loaded corpus
    pub fn new(
        plugin: Arc<dyn CmsPlugin>,
        corpus: Arc<ReferenceCorpus>,
        transport: Arc<dyn Transport>,
        warner: Arc<dyn Warner>,
        config: &ResolverConfig,
    ) -> Self {
        let hasher = Arc::new(Md5HashProvider::new(transport.clone()));
        let resolver = VersionResolver::new(corpus, hasher)
            .with_policy(config.unrecognized_policy)
            .with_concurrency(config.concurrency);

        Self {
            plugin,
            resolver,
            changelog: ChangelogProbe::new(transport, warner),
            max_files: config.max_files,
        }
    }

    /// Files that will be probed, in probe order
    pub fn files_to_probe(&self) -> Vec<&str> {
        let corpus = self.resolver.corpus();
        match self.max_files {
            Some(limit) => corpus.files_by_coverage(limit),
            None => corpus.files_known(),
        }
    }

    /// Resolve the version of `base_url`, then check its changelog
    ///
    /// A transport failure at any point aborts the scan without a report.
    pub async fn scan(&self, base_url: &str, verb: HttpVerb) -> Result<ScanReport, ProbeError> {
        let cms = self.plugin.cms_type();
        info!("Scanning {} as {}", base_url, cms.as_str());

        let files = self.files_to_probe();
        let outcome = self.resolver.resolve_version(base_url, &files, verb).await?;

        let changelog_exposed = self
            .changelog
            .check_changelog_exposed(base_url, self.plugin.changelog_path())
            .await?;

        Ok(ScanReport {
            cms: cms.as_str().to_string(),
            url: base_url.to_string(),
            verb,
            changelog_exposed,
            outcome,
        })
    }
}
