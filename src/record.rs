//! Records whose string fields can be translated in place.
//!
//! A record exposes its translatable fields through [`TranslatableRecord`].
//! Each field carries a [`FieldTag`] that decides where the lookup key comes
//! from:
//!
//! | tag       | lookup key               |
//! |-----------|--------------------------|
//! | absent/"" | the field's current text |
//! | `"-"`     | field is left untouched  |
//! | `"key"`   | `key`                    |
//!
//! Static types get their impl from [`translatable_record!`](crate::translatable_record);
//! dynamic JSON objects go through [`JsonRecord`] and a [`FieldTags`] table.

use std::collections::HashMap;

use serde_json::{
    Map,
    Value,
};

use crate::datatype::kind_of;
use crate::error::{
    Error,
    Result,
};

/// Per-field translation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag<'a> {
    /// The field's value is the lookup key.
    Value,
    /// The given key is looked up.
    Key(&'a str),
    /// The field is not translated.
    Skip,
}

impl<'a> FieldTag<'a> {
    /// Interprets a tag string: `""` is [`FieldTag::Value`], `"-"` is
    /// [`FieldTag::Skip`] and anything else is a key.
    #[must_use]
    pub fn parse(tag: &'a str) -> Self {
        match tag {
            "" => Self::Value,
            "-" => Self::Skip,
            key => Self::Key(key),
        }
    }
}

/// A record with translatable string fields.
pub trait TranslatableRecord {
    /// Calls `visit` for every translatable field, in declaration order.
    fn for_each_text_field(&mut self, visit: &mut dyn FnMut(FieldTag<'_>, &mut String));
}

/// Implements [`TranslatableRecord`] for a struct with `String` fields.
///
/// Each listed field may carry a tag after `=>`; unlisted fields are
/// ignored.
///
/// ```
/// use i18n_bundle::translatable_record;
///
/// struct Page {
///     title: String,
///     subtitle: String,
///     slug: String,
///     views: u32,
/// }
///
/// translatable_record!(Page {
///     title => "page.title",
///     subtitle,
///     slug => "-",
/// });
/// ```
#[macro_export]
macro_rules! translatable_record {
    (@tag) => {
        $crate::record::FieldTag::Value
    };
    (@tag $tag:literal) => {
        $crate::record::FieldTag::parse($tag)
    };
    ($ty:ty { $($field:ident $(=> $tag:literal)?),* $(,)? }) => {
        impl $crate::record::TranslatableRecord for $ty {
            fn for_each_text_field(
                &mut self,
                visit: &mut dyn FnMut($crate::record::FieldTag<'_>, &mut ::std::string::String),
            ) {
                $(
                    visit($crate::translatable_record!(@tag $($tag)?), &mut self.$field);
                )*
            }
        }
    };
}

/// Field name to tag table for [`JsonRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    tags: HashMap<String, String>,
}

impl FieldTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag for `field`.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, tag: impl Into<String>) -> Self {
        self.tags.insert(field.into(), tag.into());
        self
    }

    /// The tag of `field`; untagged fields are [`FieldTag::Value`].
    #[must_use]
    pub fn tag(&self, field: &str) -> FieldTag<'_> {
        self.tags.get(field).map_or(FieldTag::Value, |tag| FieldTag::parse(tag))
    }
}

impl<F, T> FromIterator<(F, T)> for FieldTags
where
    F: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, T)>>(iter: I) -> Self {
        Self { tags: iter.into_iter().map(|(field, tag)| (field.into(), tag.into())).collect() }
    }
}

/// A JSON object viewed as a record.
///
/// Every string member is a translatable field; other members are ignored.
/// Members are visited in document order.
#[derive(Debug)]
pub struct JsonRecord<'a> {
    members: &'a mut Map<String, Value>,
    tags: &'a FieldTags,
}

impl<'a> JsonRecord<'a> {
    /// Wraps `value`, which must be a JSON object.
    pub fn new(value: &'a mut Value, tags: &'a FieldTags) -> Result<Self> {
        match value {
            Value::Object(members) => Ok(Self { members, tags }),
            other => Err(Error::NotARecord { found: kind_of(other) }),
        }
    }
}

impl TranslatableRecord for JsonRecord<'_> {
    fn for_each_text_field(&mut self, visit: &mut dyn FnMut(FieldTag<'_>, &mut String)) {
        for (name, value) in self.members.iter_mut() {
            if let Value::String(text) = value {
                visit(self.tags.tag(name), text);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::bundle::Bundle;
    use crate::test_utils::{
        bundle_with,
        locale,
    };

    #[derive(Debug, Default)]
    struct Notice {
        title: String,
        body: String,
        id: String,
        count: u32,
    }

    translatable_record!(Notice {
        title => "notice.title",
        body,
        id => "-",
    });

    fn sample_bundle() -> Bundle {
        bundle_with(
            "en",
            &[
                ("en", &[("notice.title", "Notice"), ("greeting", "Hello {{.Name}}")]),
                ("es", &[("notice.title", "Aviso"), ("greeting", "Hola {{.Name}}")]),
            ],
        )
    }

    #[rstest]
    #[case::value("", FieldTag::Value)]
    #[case::skip("-", FieldTag::Skip)]
    #[case::key("errors.title", FieldTag::Key("errors.title"))]
    fn field_tag_parse(#[case] tag: &str, #[case] expected: FieldTag<'_>) {
        assert_eq!(FieldTag::parse(tag), expected);
    }

    #[rstest]
    fn macro_visits_listed_fields_in_order() {
        let mut notice = Notice::default();
        let mut seen = Vec::new();

        notice.for_each_text_field(&mut |tag, _| seen.push(format!("{tag:?}")));

        assert_eq!(seen, ["Key(\"notice.title\")", "Value", "Skip"]);
    }

    #[rstest]
    fn json_record_visits_members_in_document_order() {
        let tags = FieldTags::new().with("alpha", "-");
        let mut value = json!({ "zeta": "z", "alpha": "a", "count": 1, "mid": "m" });
        let mut record = JsonRecord::new(&mut value, &tags).unwrap();
        let mut seen = Vec::new();

        record.for_each_text_field(&mut |tag, text| seen.push(format!("{tag:?} {text}")));

        assert_eq!(seen, ["Value z", "Skip a", "Value m"]);
    }

    #[googletest::test]
    fn translate_static_record() {
        let bundle = sample_bundle();
        let mut notice = Notice {
            title: "ignored".to_string(),
            body: "greeting".to_string(),
            id: "greeting".to_string(),
            count: 2,
        };

        bundle.translate_record_with(&locale("es"), &mut notice, &json!({ "Name": "Ana" }));

        expect_that!(notice.title, eq("Aviso"));
        expect_that!(notice.body, eq("Hola Ana"));
        expect_that!(notice.id, eq("greeting"));
        expect_that!(notice.count, eq(2));
    }

    #[rstest]
    fn translate_json_record() {
        let bundle = sample_bundle();
        let tags = FieldTags::new().with("title", "notice.title").with("id", "-");
        let mut value = json!({
            "title": "",
            "body": "greeting",
            "id": "greeting",
            "count": 2,
            "nested": { "body": "greeting" },
        });

        let mut record = JsonRecord::new(&mut value, &tags).unwrap();
        bundle.translate_record(&locale("es"), &mut record);

        assert_eq!(
            value,
            json!({
                "title": "Aviso",
                "body": "Hola {{.Name}}",
                "id": "greeting",
                "count": 2,
                "nested": { "body": "greeting" },
            })
        );
    }

    #[rstest]
    #[case::string(json!("text"), "string")]
    #[case::array(json!(["a"]), "array")]
    #[case::null(json!(null), "null")]
    fn json_record_requires_object(#[case] mut value: Value, #[case] expected: &str) {
        let tags = FieldTags::new();

        let result = JsonRecord::new(&mut value, &tags);

        assert!(
            matches!(&result, Err(Error::NotARecord { found }) if *found == expected),
            "{result:?}"
        );
    }

    #[rstest]
    fn field_tags_from_iter() {
        let tags: FieldTags = [("a", "-"), ("b", "key.b")].into_iter().collect();

        assert_eq!(tags.tag("a"), FieldTag::Skip);
        assert_eq!(tags.tag("b"), FieldTag::Key("key.b"));
        assert_eq!(tags.tag("c"), FieldTag::Value);
    }
}
