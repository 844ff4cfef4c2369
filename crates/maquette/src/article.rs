//! The persisted article resource.
//!
//! The REST backend stores an article as its id, page count, and an
//! `article_json` array of per-page records. This module owns the serde
//! shapes and the two write paths the backend exposes: replacing the
//! whole `article_json` (plus page count), and patching a single page's
//! layout by its uid. The transport itself lives elsewhere — files and
//! REST both satisfy these shapes.

use serde::{Deserialize, Serialize};

use maquette_core::document::LayoutDocument;

use crate::error::MaquetteError;
use crate::plan::{PageEntry, PageKind, PagePlan};

/// Publication status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

/// One page record inside `article_json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePageResource {
    pub page_uid: String,
    pub layout_id: i64,
    pub type_of_page: PageKind,
    pub layout_json: LayoutDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The persisted article, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResource {
    pub article_id: String,
    pub page_count: u32,
    pub article_json: Vec<ArticlePageResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_order: Option<Vec<String>>,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl ArticleResource {
    /// Snapshots a plan into the "replace whole article_json" shape.
    pub fn from_plan(article_id: impl Into<String>, plan: &PagePlan) -> Self {
        let article_json = plan
            .entries()
            .iter()
            .filter_map(|entry| {
                entry.document.as_ref().map(|document| ArticlePageResource {
                    page_uid: entry.page_uid.clone(),
                    layout_id: entry.layout_id,
                    type_of_page: entry.kind,
                    layout_json: document.clone(),
                    bounding_box_image: None,
                    created_at: None,
                    updated_at: None,
                })
            })
            .collect();

        Self {
            article_id: article_id.into(),
            page_count: plan.total_pages(),
            article_json,
            layout_order: Some(
                plan.entries()
                    .iter()
                    .map(|entry| entry.page_uid.clone())
                    .collect(),
            ),
            status: ArticleStatus::Draft,
        }
    }

    /// Patches a single page's layout by its uid.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Plan`] when no page with that uid exists.
    pub fn patch_page_layout(
        &mut self,
        page_uid: &str,
        document: LayoutDocument,
    ) -> Result<(), MaquetteError> {
        let page = self
            .article_json
            .iter_mut()
            .find(|page| page.page_uid == page_uid)
            .ok_or_else(|| {
                MaquetteError::Plan(format!("article has no page with uid {page_uid}"))
            })?;
        page.layout_json = document;
        Ok(())
    }

    /// Rebuilds the editable page plan from this resource, honoring
    /// `layout_order` when present.
    pub fn to_plan(&self) -> PagePlan {
        let mut entries: Vec<PageEntry> = self
            .article_json
            .iter()
            .map(|page| PageEntry {
                page_number: 0,
                kind: page.type_of_page,
                layout_id: page.layout_id,
                document: Some(page.layout_json.clone()),
                page_uid: page.page_uid.clone(),
                render: Default::default(),
            })
            .collect();

        if let Some(order) = &self.layout_order {
            entries.sort_by_key(|entry| {
                order
                    .iter()
                    .position(|uid| uid == &entry.page_uid)
                    .unwrap_or(usize::MAX)
            });
        }

        PagePlan::from_entries(entries)
    }

    /// Parses an article resource from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Json`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, MaquetteError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the resource to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Json`] on serialization failure.
    pub fn to_json_string(&self) -> Result<String, MaquetteError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
