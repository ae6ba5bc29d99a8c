//! Bundle settings read from `.i18n-bundle.json`.

mod loader;
mod types;

use std::path::Path;

pub use loader::{
    CONFIG_FILE_NAME,
    load_from_dir,
};
pub use types::{
    BundleSettings,
    ConfigError,
    SourceSettings,
    ValidationError,
};

use crate::bundle::Bundle;
use crate::error::Result;

/// Builds the bundle described by `root`'s settings file.
///
/// Without a settings file the default settings apply, which produce an
/// English bundle with no translations.
pub fn build_bundle(root: &Path) -> Result<Bundle> {
    let settings = load_from_dir(root)?.unwrap_or_else(|| {
        tracing::debug!(root = %root.display(), "Using default settings");
        BundleSettings::default()
    });
    settings.builder(root)?.build()
}
