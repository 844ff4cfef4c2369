//! The flat form-field model derived from layout documents.
//!
//! A [`Spread`] is one editable unit of content: one physical page, or
//! both pages of a two-pager sharing a single field namespace. Its field
//! map is derived from the layout document on every load — a view over
//! the document, never a source of truth — and field values flow back
//! into the document through the rehydrator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The shape of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text with a character budget.
    #[serde(rename = "string")]
    Text,
    /// A single character, usually auto-derived (see [`FieldConfig::auto`]).
    Char,
    /// A list of strings with item count bounds.
    Array,
    /// An image slot filled by upload.
    Image,
}

/// Derived configuration for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub kind: FieldKind,
    /// Character budget; for [`FieldKind::Array`] it bounds each item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    pub mandatory: bool,
    /// Expected image aspect ratio, e.g. `"16:9"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    /// Name of the field whose first character auto-fills this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<String>,
}

impl FieldConfig {
    /// Creates a text field with the given budget.
    pub fn text(max_chars: usize, mandatory: bool) -> Self {
        Self {
            kind: FieldKind::Text,
            max_chars: Some(max_chars),
            min_items: None,
            max_items: None,
            mandatory,
            ratio: None,
            auto: None,
        }
    }

    /// Creates an image field with an optional aspect ratio.
    pub fn image(ratio: Option<String>, mandatory: bool) -> Self {
        Self {
            kind: FieldKind::Image,
            max_chars: None,
            min_items: None,
            max_items: None,
            mandatory,
            ratio,
            auto: None,
        }
    }

    /// Creates a single-character field auto-filled from `source`'s first
    /// character.
    pub fn auto_char(source: String) -> Self {
        Self {
            kind: FieldKind::Char,
            max_chars: Some(1),
            min_items: None,
            max_items: None,
            mandatory: false,
            ratio: None,
            auto: Some(source),
        }
    }
}

/// A current value for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Items(Vec<String>),
    #[default]
    Null,
}

impl FieldValue {
    /// Returns true when the value would fail a mandatory check: null, a
    /// string that is empty after trimming, or an empty array.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Items(items) => items.is_empty(),
            Self::Null => true,
        }
    }

    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the items, if this is an array value.
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}

/// One editable unit of content: a page, or a two-pager page pair sharing
/// one field namespace.
///
/// Created when a layout is selected or loaded, and discarded and
/// recreated whenever the underlying layout document for the spread is
/// swapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    /// Identifier of the layout template this spread was derived from.
    pub template_id: String,
    /// Field name → configuration, in derivation order.
    pub fields: IndexMap<String, FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text("   ".into()).is_empty());
        assert!(FieldValue::Items(vec![]).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
        assert!(!FieldValue::Items(vec!["x".into()]).is_empty());
    }

    #[test]
    fn test_field_value_untagged_serde() {
        let text: FieldValue = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(text, FieldValue::Text("hello".into()));

        let items: FieldValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(items, FieldValue::Items(vec!["a".into(), "b".into()]));

        let null: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(null, FieldValue::Null);
    }

    #[test]
    fn test_field_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&FieldKind::Text).unwrap(),
            r#""string""#
        );
        assert_eq!(
            serde_json::to_string(&FieldKind::Image).unwrap(),
            r#""image""#
        );
    }

    #[test]
    fn test_config_constructors() {
        let text = FieldConfig::text(80, true);
        assert_eq!(text.kind, FieldKind::Text);
        assert_eq!(text.max_chars, Some(80));
        assert!(text.mandatory);

        let image = FieldConfig::image(Some("16:9".into()), true);
        assert_eq!(image.kind, FieldKind::Image);
        assert_eq!(image.ratio.as_deref(), Some("16:9"));

        let auto = FieldConfig::auto_char("body_copy".into());
        assert_eq!(auto.kind, FieldKind::Char);
        assert_eq!(auto.max_chars, Some(1));
        assert_eq!(auto.auto.as_deref(), Some("body_copy"));
    }
}
