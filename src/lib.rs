//! i18n-bundle
//!
//! Translation bundles with locale fallback, templated messages and in-place
//! translation of records.
//!
//! ```
//! use i18n_bundle::{
//!     Bundle,
//!     DataType,
//!     LocaleTag,
//!     source,
//! };
//!
//! let bundle = Bundle::new(
//!     LocaleTag::english(),
//!     [source::from_str(
//!         DataType::JSON,
//!         r#"{"language": "en", "translations": {"greeting": "Hello {{.Name}}"}}"#,
//!     )],
//! )?;
//!
//! let es = LocaleTag::parse("es")?;
//! let data = serde_json::json!({ "Name": "Ana" });
//! assert_eq!(bundle.translate_with(&es, "greeting", &data), "Hello Ana");
//! assert_eq!(bundle.translate(&es, "missing"), "missing");
//! # Ok::<(), i18n_bundle::Error>(())
//! ```

pub mod bundle;
pub mod config;
pub mod datatype;
pub mod error;
pub mod global;
pub mod locale;
pub mod record;
pub mod resolver;
pub mod source;
pub mod store;
pub mod template;

#[cfg(test)]
mod test_utils;

pub use bundle::{
    Bundle,
    BundleBuilder,
    BundleExport,
    DEFAULT_KEY_SEPARATOR,
    LanguageExport,
};
pub use datatype::{
    DataType,
    DataTypeRegistry,
    register_data_type,
    set_data_type_patterns,
};
pub use error::{
    BoxError,
    Error,
    Result,
};
pub use global::{
    global_bundle,
    set_global_bundle,
};
pub use locale::{
    LocaleError,
    LocaleTag,
};
pub use record::{
    FieldTag,
    FieldTags,
    JsonRecord,
    TranslatableRecord,
};
pub use source::Source;
pub use store::{
    TranslationStore,
    Translations,
};
pub use template::{
    CacheKeying,
    TemplateEngine,
};
