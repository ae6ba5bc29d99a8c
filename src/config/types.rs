use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::bundle::{
    BundleBuilder,
    DEFAULT_KEY_SEPARATOR,
};
use crate::datatype::{
    DataType,
    DataTypeRegistry,
};
use crate::error::Result;
use crate::locale::LocaleTag;
use crate::source::{
    from_dirs,
    from_files,
};
use crate::template::CacheKeying;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "sources[0].dataType")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `.i18n-bundle.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleSettings {
    /// Empty means English.
    pub fallback_language: String,
    pub key_separator: String,
    pub template_cache: CacheKeying,
    /// Applied in order; later sources overwrite earlier keys.
    pub sources: Vec<SourceSettings>,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            fallback_language: "en".to_string(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            template_cache: CacheKeying::default(),
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceSettings {
    pub data_type: DataType,
    /// Relative paths are resolved against the settings root.
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub recursive: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { data_type: DataType::JSON, dirs: Vec::new(), files: Vec::new(), recursive: true }
    }
}

impl BundleSettings {
    /// Validates the settings.
    ///
    /// Data types are checked against the global registry, so custom types
    /// must be registered before validating.
    ///
    /// # Errors
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new("keySeparator", "Key separator cannot be empty"));
        }

        if let Err(e) = LocaleTag::parse(&self.fallback_language) {
            errors.push(ValidationError::new("fallbackLanguage", e.to_string()));
        }

        let registry = DataTypeRegistry::global();
        for (i, source) in self.sources.iter().enumerate() {
            if source.data_type.as_str().is_empty() {
                errors.push(ValidationError::new(
                    format!("sources[{i}].dataType"),
                    "Data type cannot be empty",
                ));
            } else if !registry.contains(&source.data_type) {
                errors.push(ValidationError::new(
                    format!("sources[{i}].dataType"),
                    format!("Unknown data type '{}'", source.data_type),
                ));
            }

            if source.dirs.is_empty() && source.files.is_empty() {
                errors.push(ValidationError::new(
                    format!("sources[{i}]"),
                    "At least one of dirs or files is required",
                ));
            }

            for (j, dir) in source.dirs.iter().enumerate() {
                if dir.as_os_str().is_empty() {
                    errors.push(ValidationError::new(
                        format!("sources[{i}].dirs[{j}]"),
                        "Path cannot be empty",
                    ));
                }
            }
            for (j, file) in source.files.iter().enumerate() {
                if file.as_os_str().is_empty() {
                    errors.push(ValidationError::new(
                        format!("sources[{i}].files[{j}]"),
                        "Path cannot be empty",
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validates the settings and turns them into a builder whose sources
    /// resolve relative paths against `root`.
    pub fn builder(&self, root: &Path) -> Result<BundleBuilder<'static>> {
        self.validate().map_err(ConfigError::ValidationErrors)?;

        let fallback = LocaleTag::parse(&self.fallback_language)?;
        let mut builder = BundleBuilder::new(fallback)
            .key_separator(self.key_separator.clone())
            .template_cache(self.template_cache);

        for source in &self.sources {
            if !source.dirs.is_empty() {
                let dirs = source.dirs.iter().map(|dir| root.join(dir));
                builder =
                    builder.source(from_dirs(source.data_type.clone(), source.recursive, dirs));
            }
            if !source.files.is_empty() {
                let files = source.files.iter().map(|file| root.join(file));
                builder = builder.source(from_files(source.data_type.clone(), files));
            }
        }
        Ok(builder)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn source(data_type: &str, dirs: &[&str]) -> SourceSettings {
        SourceSettings {
            data_type: DataType::new(data_type.to_string()),
            dirs: dirs.iter().map(PathBuf::from).collect(),
            ..SourceSettings::default()
        }
    }

    #[rstest]
    fn default_settings_are_valid() {
        let settings = BundleSettings::default();

        assert_that!(settings.validate(), ok(anything()));
        assert_that!(settings.fallback_language, eq("en"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.template_cache, eq(CacheKeying::Content));
    }

    #[rstest]
    fn deserializes_camel_case_with_defaults() {
        let settings: BundleSettings = serde_json::from_str(
            r#"{
                "fallbackLanguage": "es",
                "templateCache": "key",
                "sources": [{ "dataType": "toml", "dirs": ["locales"] }]
            }"#,
        )
        .unwrap();

        assert_that!(settings.fallback_language, eq("es"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.template_cache, eq(CacheKeying::Key));
        assert_that!(settings.sources.len(), eq(1));
        assert_that!(settings.sources[0].data_type, eq(&DataType::TOML));
        assert_that!(settings.sources[0].recursive, eq(true));
    }

    #[rstest]
    fn empty_key_separator_is_rejected() {
        let settings = BundleSettings { key_separator: String::new(), ..BundleSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty")),
            ]])
        );
    }

    #[rstest]
    fn invalid_fallback_language_is_rejected() {
        let settings = BundleSettings {
            fallback_language: "not a tag".to_string(),
            ..BundleSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("fallbackLanguage"))])
        );
    }

    #[rstest]
    #[case::unknown_type(source("XML", &["locales"]), "sources[0].dataType", "Unknown data type 'XML'")]
    #[case::no_paths(source("JSON", &[]), "sources[0]", "At least one of dirs or files")]
    #[case::empty_dir(source("JSON", &[""]), "sources[0].dirs[0]", "cannot be empty")]
    fn invalid_sources_are_rejected(
        #[case] source: SourceSettings,
        #[case] field_path: &str,
        #[case] message: &str,
    ) {
        let settings = BundleSettings { sources: vec![source], ..BundleSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq(field_path)),
                field!(ValidationError.message, contains_substring(message)),
            ]])
        );
    }

    #[rstest]
    fn all_errors_are_collected() {
        let settings = BundleSettings {
            key_separator: String::new(),
            sources: vec![source("JSON", &["locales"]), source("XML", &[])],
            ..BundleSettings::default()
        };

        let errors = settings.validate().unwrap_err();

        let paths: Vec<&str> = errors.iter().map(|e| e.field_path.as_str()).collect();
        assert_eq!(paths, ["keySeparator", "sources[1].dataType", "sources[1]"]);
    }

    #[rstest]
    fn config_error_lists_every_problem() {
        let error = ConfigError::ValidationErrors(vec![
            ValidationError::new("keySeparator", "Key separator cannot be empty"),
            ValidationError::new("sources[0]", "At least one of dirs or files is required"),
        ]);

        let error_message = error.to_string();

        assert_that!(error_message, contains_substring("1. keySeparator"));
        assert_that!(error_message, contains_substring("2. sources[0]"));
    }

    #[rstest]
    fn builder_fails_on_invalid_settings() {
        let settings = BundleSettings { key_separator: String::new(), ..BundleSettings::default() };

        let result = settings.builder(Path::new("."));

        assert!(
            matches!(result, Err(crate::error::Error::Config(ConfigError::ValidationErrors(_)))),
            "builder accepted invalid settings"
        );
    }
}
