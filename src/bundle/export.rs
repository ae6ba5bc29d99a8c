//! Serializable snapshot of a bundle.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

use super::Bundle;
use crate::error::Result;
use crate::locale::LocaleTag;
use crate::source::Source;

/// Every translation of a bundle, ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleExport {
    pub fallback_language: LocaleTag,
    /// Sorted by ascending language tag.
    pub languages: Vec<LanguageExport>,
}

/// Translations of a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageExport {
    pub language: LocaleTag,
    pub translations: BTreeMap<String, String>,
}

impl BundleExport {
    /// Snapshots `bundle`.
    #[must_use]
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let mut languages: Vec<LanguageExport> = bundle
            .store()
            .iter()
            .map(|(language, translations)| LanguageExport {
                language: language.clone(),
                translations: translations
                    .iter()
                    .map(|(key, text)| (key.clone(), text.clone()))
                    .collect(),
            })
            .collect();
        languages.sort_by(|a, b| a.language.cmp(&b.language));

        Self { fallback_language: bundle.fallback_language().clone(), languages }
    }

    /// Number of keys across every language.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.languages.iter().map(|language| language.translations.len()).sum()
    }
}

/// Importing an export adds all of its translations.
impl Source for BundleExport {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        for language in &self.languages {
            tracing::debug!(
                language = %language.language,
                keys = language.translations.len(),
                "Importing exported translations"
            );
            bundle.add_translations(
                language.language.clone(),
                language.translations.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            );
        }
        Ok(())
    }
}
