//! Source document shape and key flattening.

use serde::Deserialize;
use serde_json::{
    Map,
    Value,
};

use super::DataType;
use crate::error::{
    Error,
    Result,
};
use crate::locale::LocaleTag;
use crate::store::Translations;

/// Decoded form of a translations file before flattening.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourceDocument {
    language: Option<String>,
    translations: Option<Map<String, Value>>,
}

/// Turns a decoded document into its locale and flattened translations.
///
/// An empty or absent `language` yields [`LocaleTag::undefined`], which the
/// bundle later maps to its fallback language.
pub(crate) fn parse_document(
    data_type: &DataType,
    value: Value,
    separator: &str,
) -> Result<(LocaleTag, Translations)> {
    let document: SourceDocument = serde_json::from_value(value)
        .map_err(|e| Error::Decode { data_type: data_type.clone(), source: Box::new(e) })?;

    let translations = match &document.translations {
        Some(map) => flatten_translations(map, separator)?,
        None => Translations::new(),
    };

    let language = match document.language.as_deref() {
        None | Some("") => LocaleTag::undefined(),
        Some(language) => LocaleTag::parse(language)?,
    };

    Ok((language, translations))
}

/// Flattens nested mappings into separator-joined keys.
///
/// Only strings and mappings are accepted; any other value is a schema error
/// naming the full key path.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use i18n_bundle::datatype::flatten_translations;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flattened = flatten_translations(json.as_object().unwrap(), ".").unwrap();
/// assert_eq!(flattened.get("common.hello"), Some(&"Hello".to_string()));
/// assert_eq!(flattened.get("common.goodbye"), Some(&"Goodbye".to_string()));
/// ```
pub fn flatten_translations(map: &Map<String, Value>, separator: &str) -> Result<Translations> {
    let mut result = Translations::new();
    flatten_map(map, separator, None, &mut result)?;
    Ok(result)
}

fn flatten_map(
    map: &Map<String, Value>,
    separator: &str,
    prefix: Option<&str>,
    result: &mut Translations,
) -> Result<()> {
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
        match value {
            Value::String(s) => {
                result.insert(full_key, s.clone());
            }
            Value::Object(nested) => flatten_map(nested, separator, Some(&full_key), result)?,
            other => return Err(Error::Schema { key: full_key, found: kind_of(other) }),
        }
    }
    Ok(())
}

/// Human readable name of a JSON value's type.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
