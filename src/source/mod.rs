//! Translation sources.
//!
//! A [`Source`] feeds translations into a bundle while it is being built.
//! Sources are applied once, in order, and the first error aborts the build.

mod embedded;
mod fs;

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

pub use embedded::EmbeddedSource;
pub use fs::{
    DirSource,
    FileSource,
};
use rust_embed::RustEmbed;

use crate::bundle::Bundle;
use crate::datatype::{
    DataType,
    DataTypeRegistry,
};
use crate::error::{
    BoxError,
    Error,
    Result,
};
use crate::locale::LocaleTag;
use crate::store::Translations;

/// A producer of translations for a bundle under construction.
pub trait Source {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        (**self).apply(bundle)
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        (**self).apply(bundle)
    }
}

/// Decodes `bytes` with the bundle's key separator and merges the result.
fn add_decoded(bundle: &mut Bundle, data_type: &DataType, bytes: &[u8]) -> Result<()> {
    let (locale, translations) =
        DataTypeRegistry::global().decode(data_type, bytes, bundle.key_separator())?;

    tracing::debug!(
        data_type = %data_type,
        locale = %locale,
        keys = translations.len(),
        "Loaded translations"
    );
    bundle.add_translations(locale, translations);
    Ok(())
}

/// Loads every matching file under `paths`.
///
/// Entries starting with `.` are skipped. Subdirectories are only entered
/// when `recursive` is set.
pub fn from_dirs<I, P>(data_type: DataType, recursive: bool, paths: I) -> DirSource
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    DirSource::new(data_type, recursive, paths)
}

/// Loads the given files regardless of their names.
pub fn from_files<I, P>(data_type: DataType, paths: I) -> FileSource
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    FileSource::new(data_type, paths)
}

/// Loads files from a [`RustEmbed`] asset set; `""` is the asset root.
pub fn from_embedded<E, I, S>(data_type: DataType, recursive: bool, dirs: I) -> EmbeddedSource<E>
where
    E: RustEmbed,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EmbeddedSource::new(data_type, recursive, dirs)
}

/// Loads a single document from a reader.
pub const fn from_reader<R: Read>(data_type: DataType, reader: R) -> ReaderSource<R> {
    ReaderSource { data_type, reader }
}

/// Loads a single document from text.
pub fn from_str(data_type: DataType, text: impl Into<String>) -> BytesSource {
    BytesSource { data_type, bytes: text.into().into_bytes() }
}

/// Loads a single document from bytes.
pub fn from_bytes(data_type: DataType, bytes: impl Into<Vec<u8>>) -> BytesSource {
    BytesSource { data_type, bytes: bytes.into() }
}

/// Loads translations produced by a callback.
pub const fn from_fn<F>(callback: F) -> FnSource<F>
where
    F: FnMut() -> std::result::Result<(LocaleTag, Translations), BoxError>,
{
    FnSource { callback }
}

/// In-memory document; see [`from_str`] and [`from_bytes`].
#[derive(Debug, Clone)]
pub struct BytesSource {
    data_type: DataType,
    bytes: Vec<u8>,
}

impl Source for BytesSource {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        add_decoded(bundle, &self.data_type, &self.bytes)
    }
}

/// Document read from an [`io::Read`](std::io::Read); see [`from_reader`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    data_type: DataType,
    reader: R,
}

impl<R: Read> Source for ReaderSource<R> {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes).map_err(Error::Read)?;
        add_decoded(bundle, &self.data_type, &bytes)
    }
}

/// Callback producing translations; see [`from_fn`].
pub struct FnSource<F> {
    callback: F,
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

impl<F> Source for FnSource<F>
where
    F: FnMut() -> std::result::Result<(LocaleTag, Translations), BoxError>,
{
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        let (locale, translations) = (self.callback)().map_err(Error::Callback)?;
        tracing::debug!(locale = %locale, keys = translations.len(), "Loaded translations from callback");
        bundle.add_translations(locale, translations);
        Ok(())
    }
}
