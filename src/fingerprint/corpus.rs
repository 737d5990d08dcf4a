//! Reference corpus of known file hashes per CMS version
//!
//! The corpus is loaded once before scanning and is read-only afterwards.
//! Documents use the following layout:
//!
//! ```xml
//! <cms>
//!   <files>
//!     <file url="misc/drupal.js">
//!       <version nb="7.25" md5="b8a17fbb0d512a0e1266addc5a71f8d0"/>
//!       <version nb="7.26" md5="2df41b28998b4b5c9f0d718bba5b9a28"/>
//!     </file>
//!   </files>
//! </cms>
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::fingerprint::error::CorpusError;
use crate::fingerprint::ordering::{compare_versions, sort_versions};

static MD5_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{32}$").expect("valid MD5 pattern"));

/// One known (file, version, hash) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHashEntry {
    pub file_path: String,
    pub version: String,
    pub hash: String,
}

impl FileHashEntry {
    pub fn new(file_path: &str, version: &str, hash: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            version: version.to_string(),
            hash: hash.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CmsDocument {
    #[serde(default)]
    files: FilesElement,
}

#[derive(Debug, Default, Deserialize)]
struct FilesElement {
    #[serde(default, rename = "file")]
    files: Vec<FileElement>,
}

#[derive(Debug, Deserialize)]
struct FileElement {
    #[serde(rename = "@url")]
    url: String,
    #[serde(default, rename = "version")]
    versions: Vec<VersionElement>,
}

#[derive(Debug, Deserialize)]
struct VersionElement {
    #[serde(rename = "@nb")]
    nb: String,
    #[serde(rename = "@md5")]
    md5: String,
}

fn normalize_path(file_path: &str) -> &str {
    file_path.trim_start_matches('/')
}

/// Mapping of file path to the hashes recorded for it, in declared order
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    files: IndexMap<String, Vec<FileHashEntry>>,
}

impl ReferenceCorpus {
    /// Build a corpus from entries, validating hashes and rejecting duplicates
    pub fn from_entries(
        entries: impl IntoIterator<Item = FileHashEntry>,
    ) -> Result<Self, CorpusError> {
        let mut files: IndexMap<String, Vec<FileHashEntry>> = IndexMap::new();

        for entry in entries {
            let file_path = normalize_path(&entry.file_path).to_string();
            let hash = entry.hash.trim().to_ascii_lowercase();

            if !MD5_HEX.is_match(&hash) {
                return Err(CorpusError::InvalidHash {
                    file_path,
                    version: entry.version,
                    hash: entry.hash,
                });
            }

            let known = files.entry(file_path.clone()).or_default();
            if known.iter().any(|e| e.version == entry.version) {
                return Err(CorpusError::DuplicateVersion {
                    file_path,
                    version: entry.version,
                });
            }

            known.push(FileHashEntry {
                file_path,
                version: entry.version,
                hash,
            });
        }

        if files.is_empty() {
            return Err(CorpusError::Empty);
        }

        Ok(Self { files })
    }

    /// Parse an XML corpus document
    pub fn parse_xml(document: &str) -> Result<Self, CorpusError> {
        let doc: CmsDocument = quick_xml::de::from_str(document)?;

        let entries = doc.files.files.into_iter().flat_map(|file| {
            let url = file.url;
            file.versions
                .into_iter()
                .map(move |v| FileHashEntry::new(&url, &v.nb, &v.md5))
        });

        Self::from_entries(entries)
    }

    /// Read and parse an XML corpus file
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        info!("Loading corpus from {:?}", path);

        let document = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::parse_xml(&document)?;

        debug!(
            "Loaded {} files covering {} versions",
            corpus.files.len(),
            corpus.versions().len()
        );
        Ok(corpus)
    }

    /// Versions for which `file_path` is recorded with exactly `hash`
    pub fn lookup_versions(&self, file_path: &str, hash: &str) -> HashSet<String> {
        self.entries(file_path)
            .iter()
            .filter(|e| e.hash.eq_ignore_ascii_case(hash))
            .map(|e| e.version.clone())
            .collect()
    }

    /// File paths with at least one entry, in declared order
    pub fn files_known(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    pub fn entries(&self, file_path: &str) -> &[FileHashEntry] {
        self.files
            .get(normalize_path(file_path))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Every distinct version mentioned, in ascending version order
    pub fn versions(&self) -> Vec<String> {
        let unique: HashSet<&str> = self
            .files
            .values()
            .flatten()
            .map(|e| e.version.as_str())
            .collect();

        let mut versions: Vec<String> = unique.into_iter().map(str::to_string).collect();
        sort_versions(&mut versions);
        versions
    }

    pub fn highest_version(&self) -> Option<String> {
        self.files
            .values()
            .flatten()
            .map(|e| e.version.as_str())
            .max_by(|a, b| compare_versions(a, b))
            .map(str::to_string)
    }

    /// Files ordered by how many distinct hashes they carry, most first
    ///
    /// A file whose content changes often splits the version space finely, so
    /// probing these first gives the most evidence per request. Ties keep the
    /// declared order.
    pub fn files_by_coverage(&self, limit: usize) -> Vec<&str> {
        let mut ranked: Vec<(&str, usize)> = self
            .files
            .iter()
            .map(|(path, entries)| {
                let distinct: HashSet<&str> = entries.iter().map(|e| e.hash.as_str()).collect();
                (path.as_str(), distinct.len())
            })
            .collect();

        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
        ranked.into_iter().take(limit).map(|(path, _)| path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRUPAL_725: &str = "b8a17fbb0d512a0e1266addc5a71f8d0";
    const DRUPAL_726: &str = "2df41b28998b4b5c9f0d718bba5b9a28";
    const AJAX_725: &str = "0c2812999de92a5544ac9e7180d4f5ce";
    const AJAX_726: &str = "80fd687de88a27a8a548df3ca66ed92c";
    const AJAX_727: &str = "84c5c08f565963cbe29aa0dc56e5ae34";

    fn sample_corpus() -> ReferenceCorpus {
        ReferenceCorpus::from_entries(vec![
            FileHashEntry::new("misc/drupal.js", "7.25", DRUPAL_725),
            FileHashEntry::new("misc/drupal.js", "7.26", DRUPAL_726),
            FileHashEntry::new("misc/drupal.js", "7.27", DRUPAL_726),
            FileHashEntry::new("misc/ajax.js", "7.25", AJAX_725),
            FileHashEntry::new("misc/ajax.js", "7.26", AJAX_726),
            FileHashEntry::new("misc/ajax.js", "7.27", AJAX_727),
        ])
        .unwrap()
    }

    fn set(versions: &[&str]) -> HashSet<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn lookup_versions_returns_all_versions_sharing_a_hash() {
        let corpus = sample_corpus();

        assert_eq!(
            corpus.lookup_versions("misc/drupal.js", DRUPAL_726),
            set(&["7.26", "7.27"])
        );
        assert_eq!(
            corpus.lookup_versions("misc/drupal.js", DRUPAL_725),
            set(&["7.25"])
        );
    }

    #[test]
    fn lookup_versions_returns_empty_for_unknown_hash_or_file() {
        let corpus = sample_corpus();

        assert!(corpus.lookup_versions("misc/drupal.js", AJAX_725).is_empty());
        assert!(corpus.lookup_versions("misc/jquery.js", DRUPAL_725).is_empty());
    }

    #[test]
    fn lookup_versions_ignores_case_and_leading_slash() {
        let corpus = sample_corpus();

        assert_eq!(
            corpus.lookup_versions("/misc/ajax.js", &AJAX_727.to_uppercase()),
            set(&["7.27"])
        );
    }

    #[test]
    fn files_known_keeps_declared_order() {
        assert_eq!(
            sample_corpus().files_known(),
            vec!["misc/drupal.js", "misc/ajax.js"]
        );
    }

    #[test]
    fn versions_and_highest_version_use_version_order() {
        let corpus = ReferenceCorpus::from_entries(vec![
            FileHashEntry::new("misc/drupal.js", "7.9", DRUPAL_725),
            FileHashEntry::new("misc/drupal.js", "7.10", DRUPAL_726),
            FileHashEntry::new("misc/ajax.js", "7.9", AJAX_725),
        ])
        .unwrap();

        assert_eq!(corpus.versions(), vec!["7.9", "7.10"]);
        assert_eq!(corpus.highest_version(), Some("7.10".to_string()));
    }

    #[test]
    fn files_by_coverage_prefers_files_with_more_distinct_hashes() {
        let corpus = sample_corpus();

        assert_eq!(corpus.files_by_coverage(1), vec!["misc/ajax.js"]);
        assert_eq!(
            corpus.files_by_coverage(10),
            vec!["misc/ajax.js", "misc/drupal.js"]
        );
    }

    #[test]
    fn from_entries_rejects_duplicate_versions() {
        let result = ReferenceCorpus::from_entries(vec![
            FileHashEntry::new("misc/drupal.js", "7.25", DRUPAL_725),
            FileHashEntry::new("misc/drupal.js", "7.25", DRUPAL_726),
        ]);

        assert!(matches!(
            result,
            Err(CorpusError::DuplicateVersion { ref version, .. }) if version == "7.25"
        ));
    }

    #[test]
    fn from_entries_rejects_malformed_hash() {
        let result = ReferenceCorpus::from_entries(vec![FileHashEntry::new(
            "misc/drupal.js",
            "7.25",
            "not-a-hash",
        )]);

        assert!(matches!(result, Err(CorpusError::InvalidHash { .. })));
    }

    #[test]
    fn from_entries_rejects_empty_input() {
        let result = ReferenceCorpus::from_entries(Vec::new());

        assert!(matches!(result, Err(CorpusError::Empty)));
    }

    #[test]
    fn parse_xml_reads_files_and_versions() {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <cms>
              <files>
                <file url="misc/drupal.js">
                  <version nb="7.25" md5="{DRUPAL_725}"/>
                  <version nb="7.26" md5="{DRUPAL_726}"/>
                </file>
                <file url="misc/ajax.js">
                  <version nb="7.26" md5="{AJAX_726}"/>
                </file>
              </files>
            </cms>"#
        );

        let corpus = ReferenceCorpus::parse_xml(&document).unwrap();

        assert_eq!(corpus.files_known(), vec!["misc/drupal.js", "misc/ajax.js"]);
        assert_eq!(corpus.entries("misc/drupal.js").len(), 2);
        assert_eq!(
            corpus.lookup_versions("misc/ajax.js", AJAX_726),
            set(&["7.26"])
        );
    }

    #[test]
    fn parse_xml_rejects_missing_attribute() {
        let document = r#"<cms><files><file url="misc/drupal.js"><version nb="7.25"/></file></files></cms>"#;

        assert!(matches!(
            ReferenceCorpus::parse_xml(document),
            Err(CorpusError::Xml(_))
        ));
    }

    #[test]
    fn parse_xml_rejects_document_without_files() {
        assert!(matches!(
            ReferenceCorpus::parse_xml("<cms><files></files></cms>"),
            Err(CorpusError::Empty)
        ));
    }

    #[test]
    fn parse_xml_rejects_malformed_markup() {
        assert!(ReferenceCorpus::parse_xml("<cms><files><file url=").is_err());
    }
}
