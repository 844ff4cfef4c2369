//! The layout catalogue: reusable page templates.
//!
//! A catalogue entry pairs a layout document with its editorial metadata
//! (page span, category, content capacity). The catalogue is read-only
//! from this crate's perspective — it is produced by the template
//! extraction pipeline and consumed here to resolve layout ids during
//! swaps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use maquette_core::document::LayoutDocument;

use crate::plan::PageKind;

/// Editorial metadata attached to a catalogue layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub type_of_page: PageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_images: Option<u32>,
}

/// One reusable page template.
///
/// `layout_json` is parsed into a [`LayoutDocument`] when the catalogue
/// is loaded; a malformed embedded document fails the load, not the later
/// swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub layout_id: i64,
    pub layout_metadata: LayoutMetadata,
    pub layout_json: LayoutDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The loaded set of layout templates, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalogue {
    entries: IndexMap<i64, CatalogueEntry>,
}

impl LayoutCatalogue {
    /// Builds a catalogue from loaded entries. Later duplicates of an id
    /// replace earlier ones.
    pub fn from_entries(entries: Vec<CatalogueEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.layout_id, entry))
                .collect(),
        }
    }

    /// Parses a catalogue from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when any entry —
    /// including its embedded layout document — is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CatalogueEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Looks up an entry by layout id.
    pub fn get(&self, layout_id: i64) -> Option<&CatalogueEntry> {
        self.entries.get(&layout_id)
    }

    /// Resolves a layout id to its document.
    pub fn resolve_document(&self, layout_id: i64) -> Option<&LayoutDocument> {
        self.get(layout_id).map(|entry| &entry.layout_json)
    }

    /// Returns the page span of a layout, if it is in the catalogue.
    pub fn kind_of(&self, layout_id: i64) -> Option<PageKind> {
        self.get(layout_id)
            .map(|entry| entry.layout_metadata.type_of_page)
    }

    /// Number of loaded templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no templates are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in load order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(id: i64, type_of_page: &str) -> String {
        format!(
            r#"{{
                "layout_id": {id},
                "layout_metadata": {{
                    "type_of_page": "{type_of_page}",
                    "layout_category": "feature",
                    "max_number_of_words": 900,
                    "number_of_images": 2
                }},
                "layout_json": {{
                    "pageSize": {{"width": 595.0, "height": 842.0}},
                    "pages": [{{"objects": {{"foreground": [
                        {{"type": "text", "id": 1, "geometry": "0 0 100 40",
                          "transform": "1 0 0 1 0 0", "textType": "headline",
                          "story": ""}}
                    ]}}}}]
                }},
                "bounding_box_image": "https://cdn.example/bb/{id}.png",
                "page_image": "https://cdn.example/pg/{id}.png",
                "created_at": "2024-11-02T10:00:00Z"
            }}"#
        )
    }

    #[test]
    fn test_load_and_resolve() {
        let json = format!("[{}, {}]", entry_json(7, "1 pager"), entry_json(9, "2 pager"));
        let catalogue = LayoutCatalogue::from_json_str(&json).unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.kind_of(7), Some(PageKind::OnePager));
        assert_eq!(catalogue.kind_of(9), Some(PageKind::TwoPager));
        assert!(catalogue.resolve_document(7).is_some());
        assert_eq!(catalogue.resolve_document(8), None);
    }

    #[test]
    fn test_malformed_embedded_document_fails_load() {
        let json = r#"[{
            "layout_id": 1,
            "layout_metadata": {"type_of_page": "1 pager"},
            "layout_json": {"pages": "not an array"}
        }]"#;
        assert!(LayoutCatalogue::from_json_str(json).is_err());
    }
}
