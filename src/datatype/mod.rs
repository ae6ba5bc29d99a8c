//! Data types: decoders from raw bytes to translation documents.
//!
//! A [`DataType`] names an encoding. The [`DataTypeRegistry`] binds each one
//! to a decoder producing a JSON value shaped like
//! `{ "language": "en", "translations": { ... } }` and, optionally, to a set
//! of file name patterns used when walking directories.

mod document;
mod filter;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{
    Arc,
    LazyLock,
    PoisonError,
    RwLock,
};

pub use document::flatten_translations;
pub(crate) use document::kind_of;
pub use filter::FileNameFilter;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

use crate::error::{
    BoxError,
    Error,
    Result,
};
use crate::locale::LocaleTag;
use crate::store::Translations;

/// Identifier of a source encoding, e.g. `JSON`.
///
/// Identifiers are normalized to ASCII upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DataType(Cow<'static, str>);

impl DataType {
    pub const JSON: Self = Self(Cow::Borrowed("JSON"));
    pub const TOML: Self = Self(Cow::Borrowed("TOML"));
    pub const YAML: Self = Self(Cow::Borrowed("YAML"));

    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if name.bytes().any(|b| b.is_ascii_lowercase()) {
            Self(Cow::Owned(name.to_ascii_uppercase()))
        } else {
            Self(name)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DataType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&'static str> for DataType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.0.into_owned()
    }
}

/// Decoder turning raw bytes into a translation document.
pub type DecodeFn = Arc<dyn Fn(&[u8]) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// A registered data type.
struct Registration {
    /// Decoder for the encoding.
    decode: DecodeFn,
    /// File name filter for directory sources; `None` accepts every file.
    filter: Option<FileNameFilter>,
}

/// Registry of data types and their decoders.
pub struct DataTypeRegistry {
    /// Registrations by data type.
    entries: RwLock<HashMap<DataType, Registration>>,
}

impl fmt::Debug for DataTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&DataType> = entries.keys().collect();
        names.sort();
        f.debug_struct("DataTypeRegistry").field("data_types", &names).finish()
    }
}

impl Default for DataTypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Process-wide registry used by sources.
static GLOBAL: LazyLock<DataTypeRegistry> = LazyLock::new(DataTypeRegistry::with_defaults);

impl DataTypeRegistry {
    /// Creates a registry with no data types.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }

    /// Creates a registry with the built-in JSON, YAML and TOML data types.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        {
            let mut entries = registry.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(
                DataType::JSON,
                Registration {
                    decode: Arc::new(decode_json),
                    filter: FileNameFilter::new(["*.json"]).ok(),
                },
            );
            entries.insert(
                DataType::YAML,
                Registration {
                    decode: Arc::new(decode_yaml),
                    filter: FileNameFilter::new(["*.yml", "*.yaml"]).ok(),
                },
            );
            entries.insert(
                DataType::TOML,
                Registration {
                    decode: Arc::new(decode_toml),
                    filter: FileNameFilter::new(["*.toml"]).ok(),
                },
            );
        }
        registry
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers a decoder, replacing any previous one.
    ///
    /// File name patterns of an already registered data type are kept.
    pub fn register<F>(&self, data_type: DataType, decode: F)
    where
        F: Fn(&[u8]) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        tracing::debug!(data_type = %data_type, "Registering data type");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let decode: DecodeFn = Arc::new(decode);
        match entries.get_mut(&data_type) {
            Some(registration) => registration.decode = decode,
            None => {
                entries.insert(data_type, Registration { decode, filter: None });
            }
        }
    }

    /// Replaces the file name patterns of a registered data type.
    pub fn set_file_patterns<I, S>(&self, data_type: &DataType, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = FileNameFilter::new(patterns)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let registration =
            entries.get_mut(data_type).ok_or_else(|| Error::UnknownDataType(data_type.clone()))?;
        registration.filter = Some(filter);
        Ok(())
    }

    /// Removes the file name patterns of a data type, so every file is accepted.
    pub fn clear_file_patterns(&self, data_type: &DataType) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(registration) = entries.get_mut(data_type) {
            registration.filter = None;
        }
    }

    #[must_use]
    pub fn contains(&self, data_type: &DataType) -> bool {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).contains_key(data_type)
    }

    /// Returns the file name filter of a data type.
    ///
    /// `Ok(None)` means every file is accepted.
    pub fn file_filter(&self, data_type: &DataType) -> Result<Option<FileNameFilter>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(data_type)
            .map(|registration| registration.filter.clone())
            .ok_or_else(|| Error::UnknownDataType(data_type.clone()))
    }

    /// Returns true if directory sources of `data_type` should load `path`.
    pub fn accepts_file(&self, data_type: &DataType, path: &Path) -> Result<bool> {
        Ok(self.file_filter(data_type)?.is_none_or(|filter| filter.is_match(path)))
    }

    /// Decodes bytes into a locale and flattened translations.
    pub fn decode(
        &self,
        data_type: &DataType,
        bytes: &[u8],
        separator: &str,
    ) -> Result<(LocaleTag, Translations)> {
        let decode = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let registration =
                entries.get(data_type).ok_or_else(|| Error::UnknownDataType(data_type.clone()))?;
            Arc::clone(&registration.decode)
        };

        let value = decode(bytes)
            .map_err(|source| Error::Decode { data_type: data_type.clone(), source })?;
        document::parse_document(data_type, value, separator)
    }
}

fn decode_json(bytes: &[u8]) -> std::result::Result<Value, BoxError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn decode_yaml(bytes: &[u8]) -> std::result::Result<Value, BoxError> {
    Ok(serde_yaml::from_slice(bytes)?)
}

fn decode_toml(bytes: &[u8]) -> std::result::Result<Value, BoxError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(toml::from_str(text)?)
}

/// Registers a decoder in the process-wide registry.
pub fn register_data_type<F>(data_type: DataType, decode: F)
where
    F: Fn(&[u8]) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
{
    DataTypeRegistry::global().register(data_type, decode);
}

/// Replaces file name patterns in the process-wide registry.
pub fn set_data_type_patterns<I, S>(data_type: &DataType, patterns: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DataTypeRegistry::global().set_file_patterns(data_type, patterns)
}
