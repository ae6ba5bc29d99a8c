//! Sources backed by assets compiled into the binary.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::path::{
    Path,
    PathBuf,
};

use rust_embed::RustEmbed;

use super::{
    Source,
    add_decoded,
};
use crate::bundle::Bundle;
use crate::datatype::{
    DataType,
    DataTypeRegistry,
    FileNameFilter,
};
use crate::error::{
    Error,
    Result,
};

/// Translation files embedded with [`RustEmbed`].
///
/// Directories are walked like [`DirSource`](super::DirSource): hidden
/// entries are skipped, subdirectories are only entered when recursive and
/// file names must match the data type's patterns.
pub struct EmbeddedSource<E> {
    data_type: DataType,
    recursive: bool,
    dirs: Vec<String>,
    assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedSource<E> {
    pub fn new<I, S>(data_type: DataType, recursive: bool, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data_type,
            recursive,
            dirs: dirs.into_iter().map(Into::into).collect(),
            assets: PhantomData,
        }
    }

    /// Asset paths under `dir` in walk order, before any name filtering.
    fn assets_in(dir: &str) -> Vec<Cow<'static, str>> {
        let mut names: Vec<Cow<'static, str>> =
            E::iter().filter(|name| relative_to(dir, name).is_some()).collect();
        names.sort_by(|a, b| walk_order(a, b));
        names
    }

    /// Returns true if the asset at `relative` (below the walked directory)
    /// should be loaded.
    fn accepts(&self, relative: &str, filter: Option<&FileNameFilter>) -> bool {
        if relative.split('/').any(|component| component.starts_with('.')) {
            return false;
        }
        if !self.recursive && relative.contains('/') {
            return false;
        }
        filter.is_none_or(|filter| filter.is_match(Path::new(relative)))
    }
}

impl<E: RustEmbed> Source for EmbeddedSource<E> {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        let filter = DataTypeRegistry::global().file_filter(&self.data_type)?;

        for dir in &self.dirs {
            let dir = dir.trim_matches('/');
            let names = Self::assets_in(dir);
            if names.is_empty() {
                return Err(not_found(dir));
            }

            for name in names {
                let Some(relative) = relative_to(dir, &name) else {
                    continue;
                };
                if !self.accepts(relative, filter.as_ref()) {
                    continue;
                }

                let file = E::get(&name).ok_or_else(|| not_found(&name))?;
                tracing::debug!(path = %name, "Loading embedded translation file");
                add_decoded(bundle, &self.data_type, &file.data)
                    .map_err(|e| e.in_file(&*name))?;
            }
        }
        Ok(())
    }
}

impl<E> fmt::Debug for EmbeddedSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedSource")
            .field("data_type", &self.data_type)
            .field("recursive", &self.recursive)
            .field("dirs", &self.dirs)
            .finish_non_exhaustive()
    }
}

/// Path of `name` below `dir`, where `""` is the asset root.
fn relative_to<'n>(dir: &str, name: &'n str) -> Option<&'n str> {
    if dir.is_empty() {
        return Some(name);
    }
    name.strip_prefix(dir)?.strip_prefix('/')
}

/// Orders asset paths the way a depth-first walk sorted by file name visits
/// them, so `en/x.json` comes before `en-US.json`.
fn walk_order(a: &str, b: &str) -> Ordering {
    a.split('/').cmp(b.split('/'))
}

fn not_found(path: &str) -> Error {
    Error::Source {
        path: PathBuf::from(path),
        source: io::Error::new(io::ErrorKind::NotFound, "no embedded files at this path"),
    }
}
