//! Canonical locale tags.
//!
//! [`LocaleTag`] wraps a [`LanguageIdentifier`] and adds the conventions the
//! bundle relies on: an explicit "undefined" sentinel that prints as an empty
//! string, a total order over the canonical form, and a stricter parser that
//! only accepts ISO 639 shaped primary subtags.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use thiserror::Error;
use unic_langid::{
    LanguageIdentifier,
    LanguageIdentifierError,
};

use crate::error::{
    Error,
    Result,
};

/// Reason a locale string was rejected.
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error(transparent)]
    Syntax(#[from] LanguageIdentifierError),

    #[error("'{0}' is not a two or three letter language code")]
    UnregisteredLanguage(String),
}

/// Canonical, comparable locale identifier.
///
/// Equality, hashing and ordering all follow the canonical string form, so
/// `en_us`, `EN-us` and `en-US` are the same tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocaleTag(LanguageIdentifier);

impl LocaleTag {
    /// The undefined sentinel (`und`).
    #[must_use]
    pub fn undefined() -> Self {
        Self::default()
    }

    /// English, the default fallback language.
    #[must_use]
    pub fn english() -> Self {
        "en".parse().map(Self).unwrap_or_default()
    }

    /// Parses a locale string.
    ///
    /// Empty input and `und` produce [`LocaleTag::undefined`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::undefined());
        }

        let id: LanguageIdentifier = trimmed.parse().map_err(|source: LanguageIdentifierError| {
            Error::LanguageParse { input: input.to_string(), source: source.into() }
        })?;

        Self::checked(id, input)
    }

    /// Accepts `id` if its primary language subtag is empty or 2 to 3
    /// letters long; `input` is reported on failure.
    fn checked(id: LanguageIdentifier, input: &str) -> Result<Self> {
        let language = &id.language;
        if !language.is_empty() && !(2..=3).contains(&language.as_str().len()) {
            return Err(Error::LanguageParse {
                input: input.to_string(),
                source: LocaleError::UnregisteredLanguage(language.as_str().to_string()),
            });
        }

        Ok(Self(id))
    }

    /// Parses `input`, falling back when it is empty, invalid or undefined.
    ///
    /// An undefined `fallback` means English.
    #[must_use]
    pub fn parse_or(input: &str, fallback: &Self) -> Self {
        Self::parse(input).unwrap_or_default().or(fallback)
    }

    /// Returns `self`, or `fallback` when `self` is undefined.
    ///
    /// An undefined `fallback` means English.
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        if !self.is_undefined() {
            return self;
        }
        if fallback.is_undefined() { Self::english() } else { fallback.clone() }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.0 == LanguageIdentifier::default()
    }

    /// The underlying language identifier.
    #[must_use]
    pub const fn as_langid(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return Ok(());
        }
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LocaleTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialOrd for LocaleTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocaleTag {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.to_string().cmp(&other.to_string())
    }
}

impl TryFrom<LanguageIdentifier> for LocaleTag {
    type Error = Error;

    fn try_from(id: LanguageIdentifier) -> Result<Self> {
        let input = id.to_string();
        Self::checked(id, &input)
    }
}

impl From<LocaleTag> for LanguageIdentifier {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

impl Serialize for LocaleTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocaleTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
