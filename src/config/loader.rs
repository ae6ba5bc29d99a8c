//! Reading settings from disk.

use std::path::Path;

use super::{
    BundleSettings,
    ConfigError,
};

/// Name of the settings file looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = ".i18n-bundle.json";

/// Reads `.i18n-bundle.json` from `root`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: there is no settings file
///
/// Parsed settings are not validated here.
pub fn load_from_dir(root: &Path) -> Result<Option<BundleSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "Configuration file not found");
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "Loading configuration");

    let content = std::fs::read_to_string(&config_path)?;
    let settings: BundleSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
