//! CMS plugin layer
//! - types.rs: CmsType enum
//! - plugin.rs: CmsPlugin trait and the default plugin set
//! - drupal.rs: Drupal plugin

pub mod drupal;
pub mod plugin;
pub mod types;

pub use drupal::DrupalPlugin;
pub use plugin::{CmsPlugin, create_default_plugins};
pub use types::CmsType;
