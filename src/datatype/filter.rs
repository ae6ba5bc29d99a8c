//! File name filter for data types.

use std::path::Path;

use globset::{
    GlobBuilder,
    GlobSet,
    GlobSetBuilder,
};

use crate::error::{
    Error,
    Result,
};

/// Matches file names against a set of case-insensitive glob patterns.
///
/// Only the final path component is matched, so `*.json` accepts
/// `locales/nested/en.JSON`.
#[derive(Debug, Clone)]
pub struct FileNameFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl FileNameFilter {
    /// Builds a filter from glob patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|source| Error::InvalidPattern { pattern: pattern.clone(), source })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| Error::InvalidPattern { pattern: patterns.join(", "), source })?;

        Ok(Self { patterns, set })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the file name of `path` matches any pattern.
    #[must_use]
    pub fn is_match(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.set.is_match(name))
    }
}
