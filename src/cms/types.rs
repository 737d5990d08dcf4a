//! Common types for CMS plugins

/// Type of content-management system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CmsType {
    /// Drupal (misc/drupal.js, CHANGELOG.txt)
    Drupal,
}

impl CmsType {
    /// Returns the string representation of the CMS type
    pub fn as_str(&self) -> &'static str {
        match self {
            CmsType::Drupal => "drupal",
        }
    }
}

impl std::fmt::Display for CmsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
