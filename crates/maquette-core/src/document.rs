//! The layout document model.
//!
//! A layout document is the full structured description of one or more
//! pages' object placements, as stored in the layout catalogue and in
//! persisted articles. The nesting is fixed: document → pages → layers
//! (named object groups) → objects, where an object is text, an image, or
//! a group of objects.
//!
//! # Overview
//!
//! - [`LayoutDocument`] - Root entity: page size plus ordered pages
//! - [`LayoutPage`] - One physical page: layer name → ordered objects
//! - [`LayoutObject`] - Tagged sum of [`TextObject`], [`ImageObject`], [`GroupObject`]
//!
//! Layer maps are [`IndexMap`]s so layer iteration order is the JSON key
//! order; deterministic field naming depends on it.
//!
//! Documents are immutable once loaded. Editing flows through the
//! rehydrator, which always operates on a deep copy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Transform};

/// Well-known layer name for page backgrounds.
pub const BACKGROUND_LAYER: &str = "background";

/// Well-known layer name for page foregrounds.
pub const FOREGROUND_LAYER: &str = "foreground";

/// Root entity describing one or more pages' object placements.
///
/// Page geometry values are page-local; scale factors are derived by
/// consumers, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// The physical page size shared by every page.
    pub page_size: PageSize,
    /// Pages in reading order.
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    /// Parses a layout document from its JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the input is not
    /// a structurally valid layout document. Malformed geometry strings
    /// inside an otherwise valid document do *not* fail here; they parse
    /// to NaN-bearing frames (see [`crate::geometry`]).
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the document to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`]; with this model that
    /// only occurs on I/O-less formatter failures.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns the page span of this document: 1 for a single page, 2 for
    /// a two-page spread.
    pub fn page_span(&self) -> u32 {
        if self.pages.len() >= 2 { 2 } else { 1 }
    }
}

/// The physical size of a page in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// One physical page: a mapping from layer name to its ordered objects.
///
/// `"background"` and `"foreground"` are well-known layer names but the
/// layer set is open-ended. Object ids are unique within a page, not
/// globally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPage {
    pub objects: IndexMap<String, Vec<LayoutObject>>,
}

impl LayoutPage {
    /// Iterates every object on the page in layer order, without
    /// descending into groups.
    pub fn iter_objects(&self) -> impl Iterator<Item = &LayoutObject> {
        self.objects.values().flatten()
    }
}

/// A leaf or group placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutObject {
    Text(TextObject),
    Image(ImageObject),
    Group(GroupObject),
}

impl LayoutObject {
    /// Returns the object's page-local id.
    pub fn id(&self) -> i64 {
        match self {
            Self::Text(text) => text.id,
            Self::Image(image) => image.id,
            Self::Group(group) => group.id,
        }
    }

    /// Returns the object's frame.
    pub fn frame(&self) -> Rect {
        match self {
            Self::Text(text) => text.geometry,
            Self::Image(image) => image.geometry,
            Self::Group(group) => group.geometry,
        }
    }
}

/// A text object carrying a semantic role and its story content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    pub id: i64,
    #[serde(default)]
    pub geometry: Rect,
    #[serde(default)]
    pub transform: Transform,
    /// The content role, e.g. `"headline"` or `"body copy"`. Empty means
    /// the object is decoration and derives no editable field.
    #[serde(default)]
    pub text_type: String,
    /// The story text. May embed a single wrapping HTML tag pair around
    /// plain text, e.g. `"<p>…</p>"`.
    #[serde(default)]
    pub story: String,
}

/// An image object carrying a semantic role and an optional source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    pub id: i64,
    #[serde(default)]
    pub geometry: Rect,
    #[serde(default)]
    pub transform: Transform,
    /// The content role, e.g. `"feature image"`. Empty means the object
    /// derives no editable field.
    #[serde(default)]
    pub image_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ImageSource>,
}

/// Where an image object's pixels come from and how they fit its frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

/// A group of objects. Groups nest one level only in practice; members
/// that are themselves groups are treated as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupObject {
    pub id: i64,
    #[serde(default)]
    pub geometry: Rect,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub objects: Vec<LayoutObject>,
}
