//! Drupal plugin

use std::path::{Path, PathBuf};

use crate::cms::plugin::CmsPlugin;
use crate::cms::types::CmsType;

const CHANGELOG_PATH: &str = "CHANGELOG.txt";

pub struct DrupalPlugin {
    versions_file: PathBuf,
}

impl DrupalPlugin {
    /// Creates a plugin reading its corpus from `versions_file`
    pub fn new(versions_file: PathBuf) -> Self {
        Self { versions_file }
    }

    /// Creates a plugin reading `<corpus_dir>/drupal/versions.xml`
    pub fn from_corpus_dir(corpus_dir: &Path) -> Self {
        Self::new(
            corpus_dir
                .join(CmsType::Drupal.as_str())
                .join("versions.xml"),
        )
    }
}

impl CmsPlugin for DrupalPlugin {
    fn cms_type(&self) -> CmsType {
        CmsType::Drupal
    }

    fn changelog_path(&self) -> &str {
        CHANGELOG_PATH
    }

    fn versions_file(&self) -> &Path {
        &self.versions_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::error::CorpusError;

    #[test]
    fn changelog_path_points_at_site_root_changelog() {
        let plugin = DrupalPlugin::new(PathBuf::from("versions.xml"));

        assert_eq!(plugin.changelog_path(), "CHANGELOG.txt");
    }

    #[test]
    fn load_corpus_reports_missing_versions_file() {
        let plugin = DrupalPlugin::new(PathBuf::from("/nonexistent/drupal/versions.xml"));

        assert!(matches!(plugin.load_corpus(), Err(CorpusError::Read { .. })));
    }
}
