//! Maquette - magazine page-layout assembly.
//!
//! Page planning, form synchronization, and rendering orchestration for
//! magazine-style articles: pick layout templates from a catalogue, fill
//! their derived form fields, sequence pages, and drive the external
//! rendering service to a finished PDF.

pub mod article;
pub mod catalogue;
pub mod config;
pub mod plan;
pub mod render;

mod error;

pub use maquette_core::{document, field, geometry, html, semantic};
pub use maquette_forms::{DerivedSpread, ValidationReport, derive_spreads, rehydrate, validate};

pub use error::MaquetteError;

use indexmap::IndexMap;
use log::{debug, info};

use maquette_core::field::FieldValue;

use article::ArticleResource;
use catalogue::LayoutCatalogue;
use plan::{PageEntry, PageKind, PagePlan, PlanChange};

/// Editing session for one article.
///
/// Owns the page plan and the loaded layout catalogue, and ties the
/// pipeline together: deriving form fields for a page, validating edits,
/// and writing them back into the page's layout document. Rendering is
/// driven separately by [`render::RenderOrchestrator`] over the same
/// plan.
///
/// # Examples
///
/// ```rust,no_run
/// use maquette::{ArticleWorkspace, article::ArticleResource, catalogue::LayoutCatalogue};
///
/// let article = ArticleResource::from_json_str("…").expect("Failed to parse article");
/// let catalogue = LayoutCatalogue::from_json_str("…").expect("Failed to parse catalogue");
///
/// let mut workspace = ArticleWorkspace::open(&article, catalogue);
/// let spreads = workspace.spreads(0).expect("Failed to derive fields");
/// println!("{} editable fields", spreads[0].spread.fields.len());
/// ```
pub struct ArticleWorkspace {
    article_id: String,
    catalogue: LayoutCatalogue,
    plan: PagePlan,
}

impl ArticleWorkspace {
    /// Opens a workspace over a persisted article and a loaded catalogue.
    pub fn open(article: &ArticleResource, catalogue: LayoutCatalogue) -> Self {
        info!(
            article_id = article.article_id.as_str(),
            pages = article.article_json.len();
            "Opening article workspace"
        );
        Self {
            article_id: article.article_id.clone(),
            catalogue,
            plan: article.to_plan(),
        }
    }

    /// The persistent article id.
    pub fn article_id(&self) -> &str {
        &self.article_id
    }

    /// The current page plan.
    pub fn plan(&self) -> &PagePlan {
        &self.plan
    }

    /// Mutable access to the page plan for sequencing operations.
    pub fn plan_mut(&mut self) -> &mut PagePlan {
        &mut self.plan
    }

    /// The loaded layout catalogue.
    pub fn catalogue(&self) -> &LayoutCatalogue {
        &self.catalogue
    }

    /// Derives the editable spreads of the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Document`] when the entry carries no
    /// layout document.
    pub fn spreads(&self, index: usize) -> Result<Vec<DerivedSpread>, MaquetteError> {
        let entry = self.entry(index)?;
        let document = entry.document.as_ref().ok_or_else(|| {
            MaquetteError::Document(format!("page {} has no layout document", entry.page_uid))
        })?;
        Ok(derive_spreads(
            document,
            entry.kind == PageKind::TwoPager,
            &entry.layout_id.to_string(),
        ))
    }

    /// Validates field values against the page's derived field
    /// configurations.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Document`] when the entry carries no
    /// layout document.
    pub fn validate_entry(
        &self,
        index: usize,
        values: &IndexMap<String, FieldValue>,
    ) -> Result<ValidationReport, MaquetteError> {
        let spreads = self.spreads(index)?;
        let Some(derived) = spreads.first() else {
            debug!(index; "Page derives no editable fields");
            return Ok(ValidationReport::default());
        };
        Ok(validate(values, &derived.spread.fields))
    }

    /// Rehydrates edited values into the page's layout document.
    ///
    /// The entry's render state is reset: the remote workspace no longer
    /// matches the edited document.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Document`] when the entry carries no
    /// layout document.
    pub fn apply_edits(
        &mut self,
        index: usize,
        values: &IndexMap<String, FieldValue>,
        image_urls: &IndexMap<String, String>,
    ) -> Result<(), MaquetteError> {
        let entry = self.entry(index)?;
        let document = entry.document.as_ref().ok_or_else(|| {
            MaquetteError::Document(format!("page {} has no layout document", entry.page_uid))
        })?;

        let updated = rehydrate(
            document,
            entry.kind == PageKind::TwoPager,
            values,
            image_urls,
        );

        let entry = self
            .plan
            .entry_mut(index)
            .ok_or_else(|| MaquetteError::Plan(format!("no page at index {index}")))?;
        entry.document = Some(updated);
        entry.render = Default::default();
        info!(page_uid = entry.page_uid.as_str(); "Applied edits");
        Ok(())
    }

    /// Appends a page using a catalogue layout. Unknown layouts are a
    /// no-op, mirroring swap semantics.
    pub fn append_layout(&mut self, layout_id: i64) -> PlanChange {
        let Some(catalogue_entry) = self.catalogue.get(layout_id) else {
            debug!(layout_id; "Append references a layout missing from the catalogue");
            return PlanChange::None;
        };
        self.plan.append(PageEntry::new(
            catalogue_entry.layout_metadata.type_of_page,
            catalogue_entry.layout_id,
            Some(catalogue_entry.layout_json.clone()),
        ))
    }

    /// Swaps the page at `index` for one or two catalogue layouts. See
    /// [`PagePlan::swap`].
    pub fn swap(&mut self, index: usize, layout_ids: &[i64]) -> PlanChange {
        self.plan.swap(index, layout_ids, &self.catalogue)
    }

    /// Snapshots the plan into the persisted article shape.
    pub fn snapshot(&self) -> ArticleResource {
        ArticleResource::from_plan(&self.article_id, &self.plan)
    }

    fn entry(&self, index: usize) -> Result<&PageEntry, MaquetteError> {
        self.plan
            .entries()
            .get(index)
            .ok_or_else(|| MaquetteError::Plan(format!("no page at index {index}")))
    }
}
