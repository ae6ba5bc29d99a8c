//! Error types shared by the whole crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::datatype::DataType;
use crate::locale::LocaleError;

/// Boxed error produced by decoders and translation callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building a bundle or translating a record.
///
/// Lookups never produce an error: a missing translation degrades to its key
/// and a broken template degrades to its raw text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read i18n source '{}': {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read translations from reader: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to walk i18n directory '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("i18n source '{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to decode {data_type} translations: {source}")]
    Decode {
        data_type: DataType,
        #[source]
        source: BoxError,
    },

    #[error("key {key}: expected string or mapping, got {found}")]
    Schema { key: String, found: &'static str },

    #[error("failed to parse language '{input}': {source}")]
    LanguageParse {
        input: String,
        #[source]
        source: LocaleError,
    },

    #[error("unsupported data type: {0}")]
    UnknownDataType(DataType),

    #[error("invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("expected a record with named fields, got {found}")]
    NotARecord { found: &'static str },

    #[error("translations callback failed: {0}")]
    Callback(#[source] BoxError),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Attributes the error to a file.
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into(), source: Box::new(self) }
    }

    /// Returns the innermost error, looking through [`Error::File`] wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::File { source, .. } => source.root(),
            other => other,
        }
    }
}
