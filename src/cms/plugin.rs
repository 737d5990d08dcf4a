//! CMS plugin trait definition

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::cms::drupal::DrupalPlugin;
use crate::cms::types::CmsType;
use crate::fingerprint::corpus::ReferenceCorpus;
use crate::fingerprint::error::CorpusError;

/// Per-CMS knowledge shared with the generic resolution pipeline
///
/// A plugin only says where its corpus lives and which well-known paths to
/// check; the probing and narrowing logic is the same for every CMS.
pub trait CmsPlugin: Send + Sync {
    /// Returns the CMS this plugin handles
    fn cms_type(&self) -> CmsType;

    /// Path, relative to the site root, of the release changelog
    fn changelog_path(&self) -> &str;

    /// Location of the XML corpus for this CMS
    fn versions_file(&self) -> &Path;

    /// Load and validate the corpus
    fn load_corpus(&self) -> Result<ReferenceCorpus, CorpusError> {
        ReferenceCorpus::load(self.versions_file())
    }
}

/// Create the default set of plugins, reading corpora from `corpus_dir`
pub fn create_default_plugins(corpus_dir: &Path) -> HashMap<CmsType, Arc<dyn CmsPlugin>> {
    let mut plugins: HashMap<CmsType, Arc<dyn CmsPlugin>> = HashMap::new();
    plugins.insert(
        CmsType::Drupal,
        Arc::new(DrupalPlugin::from_corpus_dir(corpus_dir)),
    );
    plugins
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn create_default_plugins_registers_drupal_under_corpus_dir() {
        let plugins = create_default_plugins(Path::new("/srv/corpora"));

        let drupal = plugins.get(&CmsType::Drupal).unwrap();
        assert_eq!(drupal.cms_type(), CmsType::Drupal);
        assert_eq!(
            drupal.versions_file(),
            PathBuf::from("/srv/corpora/drupal/versions.xml")
        );
    }
}
