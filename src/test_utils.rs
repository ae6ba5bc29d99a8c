//! Helpers shared by unit tests.
#![cfg(test)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::bundle::Bundle;
use crate::locale::LocaleTag;
use crate::store::Translations;

/// Parses a locale tag, panicking on invalid input.
pub(crate) fn locale(tag: &str) -> LocaleTag {
    LocaleTag::parse(tag).expect("valid locale tag")
}

/// Builds a translations map from key/text pairs.
pub(crate) fn translations(entries: &[(&str, &str)]) -> Translations {
    entries.iter().map(|(key, text)| ((*key).to_string(), (*text).to_string())).collect()
}

/// Builds a bundle from `(locale, entries)` pairs with the given fallback.
pub(crate) fn bundle_with(fallback: &str, locales: &[(&str, &[(&str, &str)])]) -> Bundle {
    let mut bundle = Bundle::builder(locale(fallback)).build().expect("empty bundle builds");
    for (tag, entries) in locales {
        bundle.add_translations(locale(tag), translations(entries));
    }
    bundle
}
