//! Translation bundle: the public entry point.

mod export;

use std::fmt;
use std::sync::Arc;

pub use export::{
    BundleExport,
    LanguageExport,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::locale::LocaleTag;
use crate::record::{
    FieldTag,
    TranslatableRecord,
};
use crate::resolver::Resolver;
use crate::source::Source;
use crate::store::{
    TranslationStore,
    Translations,
};
use crate::template::{
    CacheKeying,
    TemplateEngine,
};

/// Default separator joining nested keys.
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// Translations of every locale plus the fallback rules to look them up.
///
/// A bundle is built once from an ordered list of sources and read from then
/// on. Lookups never fail: a missing translation renders as its key.
#[derive(Debug, Clone)]
pub struct Bundle {
    fallback: LocaleTag,
    key_separator: String,
    store: TranslationStore,
    templates: Arc<TemplateEngine>,
}

impl Bundle {
    /// Builds a bundle from `sources`, applied in order.
    ///
    /// The first failing source aborts the build. An undefined `fallback`
    /// means English.
    pub fn new<I>(fallback: LocaleTag, sources: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Source,
    {
        Self::builder(fallback).sources(sources).build()
    }

    #[must_use]
    pub fn builder<'a>(fallback: LocaleTag) -> BundleBuilder<'a> {
        BundleBuilder::new(fallback)
    }

    /// An English bundle without translations.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            fallback: LocaleTag::english(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            store: TranslationStore::new(),
            templates: TemplateEngine::shared(CacheKeying::default()),
        }
    }

    /// Merges translations into `locale`, or into the fallback locale when
    /// `locale` is undefined. Existing keys are overwritten.
    pub fn add_translations(&mut self, locale: LocaleTag, translations: Translations) {
        let locale = locale.or(&self.fallback);
        self.store.merge(locale, translations);
    }

    /// Adds a single translation; see [`Bundle::add_translations`].
    pub fn add_translation(
        &mut self,
        locale: LocaleTag,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        let locale = locale.or(&self.fallback);
        self.store.insert(locale, key, text);
    }

    /// Exact lookup without fallback or templating.
    #[must_use]
    pub fn get(&self, locale: &LocaleTag, key: &str) -> Option<&str> {
        self.store.get(locale, key)
    }

    #[must_use]
    pub const fn fallback_language(&self) -> &LocaleTag {
        &self.fallback
    }

    #[must_use]
    pub fn key_separator(&self) -> &str {
        &self.key_separator
    }

    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Loaded languages in ascending order.
    #[must_use]
    pub fn languages(&self) -> Vec<&LocaleTag> {
        self.store.locales()
    }

    #[must_use]
    pub const fn templates(&self) -> &Arc<TemplateEngine> {
        &self.templates
    }

    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.fallback)
    }

    /// Translates `key` for `locale`.
    #[must_use]
    pub fn translate(&self, locale: &LocaleTag, key: &str) -> String {
        self.render(locale, key, || Ok(Value::Null))
    }

    /// Translates `key` for `locale`, rendering the text as a template
    /// against `data`.
    #[must_use]
    pub fn translate_with<D>(&self, locale: &LocaleTag, key: &str, data: &D) -> String
    where
        D: Serialize + ?Sized,
    {
        self.render(locale, key, || serde_json::to_value(data))
    }

    /// Rewrites every translatable field of `record`.
    pub fn translate_record<R>(&self, locale: &LocaleTag, record: &mut R)
    where
        R: TranslatableRecord + ?Sized,
    {
        self.translate_fields(locale, record, &|| Ok(Value::Null));
    }

    /// Rewrites every translatable field of `record`, rendering templates
    /// against `data`.
    pub fn translate_record_with<R, D>(&self, locale: &LocaleTag, record: &mut R, data: &D)
    where
        R: TranslatableRecord + ?Sized,
        D: Serialize + ?Sized,
    {
        self.translate_fields(locale, record, &|| serde_json::to_value(data));
    }

    /// Exports every stored translation.
    #[must_use]
    pub fn export(&self) -> BundleExport {
        BundleExport::from_bundle(self)
    }

    /// Rebuilds a bundle from an export.
    pub fn from_export(export: BundleExport) -> Result<Self> {
        let fallback = export.fallback_language.clone();
        Self::new(fallback, [export])
    }

    fn translate_fields<R>(
        &self,
        locale: &LocaleTag,
        record: &mut R,
        data: &dyn Fn() -> serde_json::Result<Value>,
    ) where
        R: TranslatableRecord + ?Sized,
    {
        record.for_each_text_field(&mut |tag, value| {
            let translated = match tag {
                FieldTag::Skip => return,
                FieldTag::Key(key) => self.render(locale, key, data),
                FieldTag::Value => self.render(locale, value, data),
            };
            *value = translated;
        });
    }

    fn render<F>(&self, locale: &LocaleTag, key: &str, data: F) -> String
    where
        F: FnOnce() -> serde_json::Result<Value>,
    {
        match self.resolver().resolve(locale, key) {
            Some(resolved) => self.templates.render(&resolved.key, resolved.text, data),
            None => {
                tracing::trace!(locale = %locale, key, "Missing translation");
                self.templates.render(key, key, data)
            }
        }
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::empty()
    }
}

/// Configures and builds a [`Bundle`].
pub struct BundleBuilder<'a> {
    fallback: LocaleTag,
    key_separator: String,
    keying: CacheKeying,
    templates: Option<Arc<TemplateEngine>>,
    sources: Vec<Box<dyn Source + 'a>>,
}

impl<'a> BundleBuilder<'a> {
    #[must_use]
    pub fn new(fallback: LocaleTag) -> Self {
        Self {
            fallback,
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            keying: CacheKeying::default(),
            templates: None,
            sources: Vec::new(),
        }
    }

    /// Separator joining nested keys of decoded documents.
    #[must_use]
    pub fn key_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_separator = separator.into();
        self
    }

    /// Uses the shared engine for `keying`. Ignored when an engine is given
    /// with [`BundleBuilder::templates`].
    #[must_use]
    pub const fn template_cache(mut self, keying: CacheKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Uses `engine` instead of a shared one.
    #[must_use]
    pub fn templates(mut self, engine: Arc<TemplateEngine>) -> Self {
        self.templates = Some(engine);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Source + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    #[must_use]
    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Source + 'a,
    {
        for source in sources {
            self.sources.push(Box::new(source));
        }
        self
    }

    /// Applies the sources in order.
    pub fn build(self) -> Result<Bundle> {
        let mut bundle = Bundle {
            fallback: self.fallback.or(&LocaleTag::english()),
            key_separator: self.key_separator,
            store: TranslationStore::new(),
            templates: self.templates.unwrap_or_else(|| TemplateEngine::shared(self.keying)),
        };

        for mut source in self.sources {
            source.apply(&mut bundle)?;
        }

        tracing::debug!(
            fallback = %bundle.fallback,
            languages = bundle.store.len(),
            keys = bundle.store.key_count(),
            "Bundle built"
        );
        Ok(bundle)
    }
}

impl fmt::Debug for BundleBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleBuilder")
            .field("fallback", &self.fallback)
            .field("key_separator", &self.key_separator)
            .field("keying", &self.keying)
            .field("templates", &self.templates)
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::datatype::DataType;
    use crate::error::Error;
    use crate::source;
    use crate::test_utils::{
        bundle_with,
        locale,
        translations,
    };

    #[rstest]
    fn undefined_fallback_becomes_english() {
        let bundle = Bundle::builder(LocaleTag::undefined()).build().unwrap();

        assert_eq!(bundle.fallback_language(), &LocaleTag::english());
    }

    #[googletest::test]
    fn undefined_locale_merges_into_fallback() {
        let mut bundle = Bundle::builder(locale("de")).build().unwrap();

        bundle.add_translations(LocaleTag::undefined(), translations(&[("a", "A")]));
        bundle.add_translation(LocaleTag::undefined(), "b", "B");

        expect_that!(bundle.get(&locale("de"), "a"), some(eq("A")));
        expect_that!(bundle.get(&locale("de"), "b"), some(eq("B")));
        expect_that!(bundle.languages().len(), eq(1));
    }

    #[googletest::test]
    fn later_sources_win() {
        let first = r#"{"language": "en", "translations": {"a": "first", "b": "b"}}"#;
        let second = r#"{"language": "en", "translations": {"a": "second"}}"#;

        let bundle = Bundle::new(
            locale("en"),
            [source::from_str(DataType::JSON, first), source::from_str(DataType::JSON, second)],
        )
        .unwrap();

        expect_that!(bundle.translate(&locale("en"), "a"), eq("second"));
        expect_that!(bundle.translate(&locale("en"), "b"), eq("b"));
    }

    #[rstest]
    #[case::exact("es", "test_1", "Prueba 1")]
    #[case::lowercase("es", "TEST_1", "Prueba 1")]
    #[case::fallback("es", "test_2", "Test 2")]
    #[case::undefined("", "test_1", "Test 1")]
    #[case::missing("es", "Not.Found", "Not.Found")]
    #[case::missing_lowercase_key_text("es", "Missing {{.N}}", "Missing {{.N}}")]
    fn translate_cases(#[case] tag: &str, #[case] key: &str, #[case] expected: &str) {
        let bundle = bundle_with(
            "en",
            &[
                ("en", &[("test_1", "Test 1"), ("test_2", "Test 2")]),
                ("es", &[("test_1", "Prueba 1")]),
            ],
        );

        assert_eq!(bundle.translate(&locale(tag), key), expected);
    }

    #[rstest]
    fn missing_key_is_rendered_as_template() {
        let bundle = Bundle::empty();

        let rendered =
            bundle.translate_with(&locale("en"), "Hi {{.Name}}", &json!({ "Name": "Bo" }));

        assert_eq!(rendered, "Hi Bo");
    }

    #[googletest::test]
    fn translate_with_struct_data() {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Data {
            test_n: u32,
        }

        let bundle = bundle_with("en", &[("en", &[("test_3", "Test {{.TestN}} in JSON")])]);

        expect_that!(
            bundle.translate_with(&locale("en"), "test_3", &Data { test_n: 3 }),
            eq("Test 3 in JSON")
        );
        expect_that!(bundle.translate(&locale("en"), "test_3"), eq("Test {{.TestN}} in JSON"));
    }

    #[rstest]
    fn explicit_engine_is_used() {
        let engine = Arc::new(TemplateEngine::new(CacheKeying::Key));
        let mut bundle =
            Bundle::builder(locale("en")).templates(Arc::clone(&engine)).build().unwrap();
        bundle.add_translation(locale("en"), "k", "{{.}}");

        assert_eq!(bundle.translate_with(&locale("en"), "k", "v"), "v");
        assert_eq!(engine.len(), 1);
        assert!(Arc::ptr_eq(bundle.templates(), &engine));
    }

    #[rstest]
    fn failing_source_aborts_build() {
        let valid = r#"{"translations": {"a": "A"}}"#;
        let invalid = r#"{"translations": {"a": 1}}"#;

        let result = Bundle::new(
            locale("en"),
            [source::from_str(DataType::JSON, valid), source::from_str(DataType::JSON, invalid)],
        );

        assert!(matches!(result, Err(Error::Schema { .. })), "{result:?}");
    }
}
