//! Per-locale translation storage.

use std::collections::HashMap;

use crate::locale::LocaleTag;

/// Flattened translations of one locale: key to text.
pub type Translations = HashMap<String, String>;

/// Translations of every loaded locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStore {
    locales: HashMap<LocaleTag, Translations>,
}

impl TranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges translations into a locale. Existing keys are overwritten.
    pub fn merge(&mut self, locale: LocaleTag, translations: Translations) {
        let entry = self.locales.entry(locale).or_default();
        if entry.is_empty() {
            *entry = translations;
        } else {
            entry.extend(translations);
        }
    }

    /// Inserts a single translation, returning the text it replaced.
    pub fn insert(
        &mut self,
        locale: LocaleTag,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<String> {
        self.locales.entry(locale).or_default().insert(key.into(), text.into())
    }

    /// Exact lookup without any fallback.
    #[must_use]
    pub fn get(&self, locale: &LocaleTag, key: &str) -> Option<&str> {
        self.locales.get(locale)?.get(key).map(String::as_str)
    }

    /// The stored locale tag together with its translations.
    #[must_use]
    pub fn entry(&self, locale: &LocaleTag) -> Option<(&LocaleTag, &Translations)> {
        self.locales.get_key_value(locale)
    }

    #[must_use]
    pub fn translations(&self, locale: &LocaleTag) -> Option<&Translations> {
        self.locales.get(locale)
    }

    /// Loaded locales in ascending order.
    #[must_use]
    pub fn locales(&self) -> Vec<&LocaleTag> {
        let mut locales: Vec<&LocaleTag> = self.locales.keys().collect();
        locales.sort();
        locales
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleTag, &Translations)> {
        self.locales.iter()
    }

    /// Number of locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Number of keys across every locale.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.locales.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        locale,
        translations,
    };

    #[googletest::test]
    fn merge_overwrites_existing_keys() {
        let mut store = TranslationStore::new();
        store.merge(locale("en"), translations(&[("a", "first"), ("b", "kept")]));
        store.merge(locale("en"), translations(&[("a", "second")]));

        expect_that!(store.get(&locale("en"), "a"), some(eq("second")));
        expect_that!(store.get(&locale("en"), "b"), some(eq("kept")));
        expect_that!(store.key_count(), eq(2));
    }

    #[rstest]
    fn get_is_exact() {
        let mut store = TranslationStore::new();
        store.insert(locale("en-US"), "Hello", "Hi");

        assert_eq!(store.get(&locale("en_us"), "Hello"), Some("Hi"));
        assert_eq!(store.get(&locale("en-US"), "hello"), None);
        assert_eq!(store.get(&locale("en"), "Hello"), None);
    }

    #[rstest]
    fn insert_returns_replaced_text() {
        let mut store = TranslationStore::new();

        assert_eq!(store.insert(locale("en"), "a", "1"), None);
        assert_eq!(store.insert(locale("en"), "a", "2"), Some("1".to_string()));
    }

    #[googletest::test]
    fn locales_are_sorted() {
        let mut store = TranslationStore::new();
        for tag in ["ru", "de", "en"] {
            store.insert(locale(tag), "k", "v");
        }

        let printed: Vec<String> = store.locales().iter().map(ToString::to_string).collect();

        expect_that!(printed, elements_are![eq("de"), eq("en"), eq("ru")]);
        expect_that!(store.len(), eq(3));
        expect_that!(store.is_empty(), eq(false));
    }
}
