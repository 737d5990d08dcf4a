//! Corpus test utilities

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cms_fingerprint::fingerprint::corpus::ReferenceCorpus;

/// Fixture corpus covering Drupal 7.25 to 7.27
const FIXTURE_CORPUS: &str = "tests/fixtures/versions.xml";

pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_CORPUS)
}

pub fn fixture_corpus() -> Arc<ReferenceCorpus> {
    Arc::new(ReferenceCorpus::load(&fixture_path()).unwrap())
}

/// Body whose MD5 the fixture records for `file_path` at `version`
pub fn asset_body(file_path: &str, version: &str) -> String {
    match file_path {
        "misc/drupal.js" if version == "7.25" => "drupal.js 7.25".to_string(),
        "misc/drupal.js" => "drupal.js 7.26".to_string(),
        "misc/ajax.js" => format!("ajax.js {}", version),
        "misc/tabledrag.js" => "tabledrag.js 7".to_string(),
        other => panic!("no fixture body for {}", other),
    }
}
