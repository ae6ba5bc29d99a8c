//! Fallback-chain lookup.

use std::borrow::Cow;

use crate::locale::LocaleTag;
use crate::store::TranslationStore;

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'s, 'k> {
    /// The key that matched: the request key, or its lowercase form.
    pub key: Cow<'k, str>,
    /// The stored text.
    pub text: &'s str,
    /// The locale the text was found in.
    pub locale: &'s LocaleTag,
}

/// Looks up keys through the fallback chain of a store.
///
/// The chain for `(locale, key)` is:
///
/// 1. an undefined `locale` is replaced by the fallback locale;
/// 2. `(locale, key)`;
/// 3. `(locale, lowercase(key))`;
/// 4. steps 2 and 3 against the fallback locale, when it differs.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'s> {
    store: &'s TranslationStore,
    fallback: &'s LocaleTag,
}

impl<'s> Resolver<'s> {
    #[must_use]
    pub const fn new(store: &'s TranslationStore, fallback: &'s LocaleTag) -> Self {
        Self { store, fallback }
    }

    /// Resolves `key` for `locale`, or `None` when nothing in the chain matches.
    #[must_use]
    pub fn resolve<'k>(&self, locale: &LocaleTag, key: &'k str) -> Option<Resolved<'s, 'k>> {
        let locale = if locale.is_undefined() { self.fallback } else { locale };

        if let Some(found) = self.resolve_in(locale, key) {
            return Some(found);
        }
        if locale != self.fallback {
            return self.resolve_in(self.fallback, key);
        }
        None
    }

    /// Exact then lowercase lookup within a single locale.
    fn resolve_in<'k>(&self, locale: &LocaleTag, key: &'k str) -> Option<Resolved<'s, 'k>> {
        let (locale, translations) = self.store.entry(locale)?;

        if let Some(text) = translations.get(key) {
            return Some(Resolved { key: Cow::Borrowed(key), text, locale });
        }

        let lower = key.to_lowercase();
        if lower == key {
            return None;
        }
        translations
            .get(&lower)
            .map(|text| Resolved { key: Cow::Owned(lower), text, locale })
    }
}
