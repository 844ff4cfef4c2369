//! The external rendering orchestrator.
//!
//! Drives each page of an article through the rendering service:
//!
//! ```text
//! not_started ──upload──► uploaded ──convert──► converted ──export──► pdf_exported
//! ```
//!
//! Convert and export may queue remotely; the orchestrator polls the
//! queue sequentially at a fixed interval with a fixed attempt ceiling.
//! The convert step additionally repackages the intermediate artifact
//! (download, rezip, re-upload) before the designer view URL exists.
//!
//! Whole-article processing is strictly sequential: one page finishes (or
//! is confirmed already finished) before the next is attempted, keeping
//! remote load predictable and the shared per-article workspace free of
//! races. Failures halt a page at its last good stage; retrying re-runs
//! only the failed step. Merging and publishing require every page to be
//! `pdf_exported`.

pub mod client;

use std::io::Write;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::article::{ArticleResource, ArticleStatus};
use crate::config::ServiceConfig;
use crate::plan::{PageEntry, PagePlan};

use client::{DesignService, ExportTicket, QueueState, ResultType, ServiceError};

/// Coarse per-page progress through the rendering service.
///
/// Advances monotonically; reset only by [`RenderOrchestrator::reset`]
/// (which implies a new upload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStage {
    #[default]
    NotStarted,
    Uploaded,
    Converted,
    PdfExported,
}

/// Transient busy marker layered over the coarse stage while a step is in
/// flight. Used to disable conflicting actions; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyState {
    Uploading,
    Converting,
    Exporting,
}

/// Rendering progress attached to one page-plan entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderState {
    pub stage: RenderStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_download_url: Option<String>,
    #[serde(skip)]
    pub busy: Option<BusyState>,
}

/// The step a failure occurred in, for error reporting and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    Upload,
    Convert,
    ExportPdf,
    Merge,
    Publish,
}

impl std::fmt::Display for RenderStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::Convert => "convert",
            Self::ExportPdf => "export-pdf",
            Self::Merge => "merge",
            Self::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Failures of the rendering pipeline.
///
/// Every variant is recoverable by retrying the failed step; the page's
/// state machine stays at its last good stage.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{step} failed for page {page_uid}: {source}")]
    Service {
        step: RenderStep,
        page_uid: String,
        source: ServiceError,
    },

    #[error("{step} queue for page {page_uid} reported `{state}`")]
    QueueFailed {
        step: RenderStep,
        page_uid: String,
        state: String,
    },

    #[error("{step} queue for page {page_uid} still pending after {attempts} attempts")]
    QueueTimeout {
        step: RenderStep,
        page_uid: String,
        attempts: u32,
    },

    #[error("page {page_uid} has no layout document to render")]
    MissingDocument { page_uid: String },

    #[error("page {page_uid} is at stage {stage:?}, expected at least {expected:?}")]
    WrongStage {
        page_uid: String,
        stage: RenderStage,
        expected: RenderStage,
    },

    #[error("{ready} of {total} pages are PDF-exported; all pages must be ready")]
    NotReady { ready: usize, total: usize },

    #[error("merge failed: {source}")]
    MergeFailed { source: ServiceError },

    #[error("could not serialize layout document for page {page_uid}: {source}")]
    Artifact {
        page_uid: String,
        source: serde_json::Error,
    },

    #[error("could not repackage artifact for page {page_uid}: {message}")]
    Repackage { page_uid: String, message: String },
}

/// Queue polling parameters: a fixed interval and attempt ceiling
/// (10 s × 30 attempts ≈ 5 minutes by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            attempts: 30,
        }
    }
}

impl From<&ServiceConfig> for PollPolicy {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs()),
            attempts: config.poll_attempts(),
        }
    }
}

/// Drives the per-page rendering state machines of one article.
///
/// The job id is derived from the article's persistent id and injected
/// here once, so every page lands in the same remote workspace.
pub struct RenderOrchestrator<S: DesignService> {
    service: S,
    job_id: String,
    poll: PollPolicy,
}

impl<S: DesignService> RenderOrchestrator<S> {
    pub fn new(service: S, job_id: impl Into<String>, poll: PollPolicy) -> Self {
        Self {
            service,
            job_id: job_id.into(),
            poll,
        }
    }

    /// The per-article job id shared by every page.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Uploads the entry's document unless a remote document name is
    /// already recorded, then converts. The skip is what makes re-connect
    /// after a failure resume instead of starting over.
    pub fn connect(&self, entry: &mut PageEntry) -> Result<(), RenderError> {
        self.ensure_uploaded(entry)?;
        self.convert(entry)
    }

    /// Advances the entry from its current stage to `pdf_exported`,
    /// running only the steps that are still missing.
    pub fn process_page(&self, entry: &mut PageEntry) -> Result<(), RenderError> {
        if entry.render.stage < RenderStage::Uploaded {
            self.ensure_uploaded(entry)?;
        }
        if entry.render.stage < RenderStage::Converted {
            self.convert(entry)?;
        }
        if entry.render.stage < RenderStage::PdfExported {
            self.export_pdf(entry)?;
        }
        Ok(())
    }

    /// Runs every page of the plan to `pdf_exported`, strictly in
    /// sequence. The first failing page halts the walk; pages already
    /// processed keep their progress.
    pub fn process_article(&self, plan: &mut PagePlan) -> Result<(), RenderError> {
        let total = plan.entries().len();
        for index in 0..total {
            let Some(entry) = plan.entry_mut(index) else {
                break;
            };
            info!(
                page_uid = entry.page_uid.as_str(),
                position = index + 1,
                total;
                "Rendering page"
            );
            self.process_page(entry)?;
        }
        Ok(())
    }

    /// Serializes and uploads the entry's layout document.
    fn ensure_uploaded(&self, entry: &mut PageEntry) -> Result<(), RenderError> {
        if entry.render.document_name.is_some() {
            debug!(page_uid = entry.page_uid.as_str(); "Document already uploaded, skipping");
            if entry.render.stage < RenderStage::Uploaded {
                entry.render.stage = RenderStage::Uploaded;
            }
            entry.render.job_id = Some(self.job_id.clone());
            return Ok(());
        }

        let document = entry
            .document
            .as_ref()
            .ok_or_else(|| RenderError::MissingDocument {
                page_uid: entry.page_uid.clone(),
            })?;
        let json = document
            .to_json_string()
            .map_err(|source| RenderError::Artifact {
                page_uid: entry.page_uid.clone(),
                source,
            })?;

        entry.render.busy = Some(BusyState::Uploading);
        let result = self.service.upload(
            &self.job_id,
            &format!("{}.json", entry.page_uid),
            json.as_bytes(),
        );
        entry.render.busy = None;

        let name = result.map_err(|source| RenderError::Service {
            step: RenderStep::Upload,
            page_uid: entry.page_uid.clone(),
            source,
        })?;

        info!(page_uid = entry.page_uid.as_str(), document_name = name.as_str(); "Uploaded");
        entry.render.job_id = Some(self.job_id.clone());
        entry.render.document_name = Some(name);
        entry.render.stage = RenderStage::Uploaded;
        Ok(())
    }

    /// Converts the uploaded document to the intermediate design format,
    /// repackages the artifact, and records the designer URL.
    pub fn convert(&self, entry: &mut PageEntry) -> Result<(), RenderError> {
        let document_name = self.require_document_name(entry, RenderStage::Uploaded)?;
        let export_name = entry.page_uid.clone();

        entry.render.busy = Some(BusyState::Converting);
        let result = self.run_export(
            RenderStep::Convert,
            &entry.page_uid,
            &document_name,
            &export_name,
            ResultType::Desd,
        );
        entry.render.busy = None;
        result?;

        // The designer only opens the artifact after it has been
        // repackaged: download, rezip, re-upload.
        let artifact = format!("output/{export_name}.desd");
        let bytes = self
            .service
            .download(&self.job_id, &artifact)
            .map_err(|source| RenderError::Service {
                step: RenderStep::Convert,
                page_uid: entry.page_uid.clone(),
                source,
            })?;
        let zipped = zip_single(&format!("{export_name}.desd"), &bytes).map_err(|message| {
            RenderError::Repackage {
                page_uid: entry.page_uid.clone(),
                message,
            }
        })?;
        self.service
            .upload(&self.job_id, &format!("{export_name}.zip"), &zipped)
            .map_err(|source| RenderError::Service {
                step: RenderStep::Convert,
                page_uid: entry.page_uid.clone(),
                source,
            })?;

        entry.render.designer_url = Some(self.service.designer_url(&self.job_id, &export_name));
        entry.render.stage = RenderStage::Converted;
        info!(page_uid = entry.page_uid.as_str(); "Converted");
        Ok(())
    }

    /// Exports the converted document to PDF and records the download
    /// URL.
    pub fn export_pdf(&self, entry: &mut PageEntry) -> Result<(), RenderError> {
        let document_name = self.require_document_name(entry, RenderStage::Converted)?;
        let export_name = entry.page_uid.clone();

        entry.render.busy = Some(BusyState::Exporting);
        let result = self.run_export(
            RenderStep::ExportPdf,
            &entry.page_uid,
            &document_name,
            &export_name,
            ResultType::Pdf,
        );
        entry.render.busy = None;
        result?;

        let artifact = format!("output/{export_name}.pdf");
        entry.render.pdf_download_url = Some(self.service.download_url(&self.job_id, &artifact));
        entry.render.stage = RenderStage::PdfExported;
        info!(page_uid = entry.page_uid.as_str(); "PDF exported");
        Ok(())
    }

    /// Merges the article's page PDFs into one document.
    ///
    /// Refuses unless every page is `pdf_exported`; URLs are collected in
    /// page order (by page number, not array position).
    pub fn merge(&self, plan: &PagePlan) -> Result<String, RenderError> {
        let mut exported: Vec<&PageEntry> = Vec::with_capacity(plan.entries().len());
        for entry in plan.entries() {
            if entry.render.stage == RenderStage::PdfExported {
                exported.push(entry);
            }
        }
        if exported.len() != plan.entries().len() {
            return Err(RenderError::NotReady {
                ready: exported.len(),
                total: plan.entries().len(),
            });
        }

        exported.sort_by_key(|entry| entry.page_number);
        let urls: Vec<String> = exported
            .iter()
            .filter_map(|entry| entry.render.pdf_download_url.clone())
            .collect();

        self.service
            .merge_pdfs(&urls)
            .map_err(|source| RenderError::MergeFailed { source })
    }

    /// Flips the article out of draft. Permitted only once every page is
    /// `pdf_exported`.
    pub fn publish(
        &self,
        plan: &PagePlan,
        article: &mut ArticleResource,
    ) -> Result<(), RenderError> {
        let ready = plan
            .entries()
            .iter()
            .filter(|entry| entry.render.stage == RenderStage::PdfExported)
            .count();
        if ready != plan.entries().len() {
            return Err(RenderError::NotReady {
                ready,
                total: plan.entries().len(),
            });
        }
        article.status = ArticleStatus::Published;
        info!(article_id = article.article_id.as_str(); "Published");
        Ok(())
    }

    /// Resets a page to `not_started`, discarding its remote identifiers.
    /// The next upload starts a fresh remote document.
    pub fn reset(&self, entry: &mut PageEntry) {
        entry.render = RenderState::default();
    }

    fn require_document_name(
        &self,
        entry: &PageEntry,
        expected: RenderStage,
    ) -> Result<String, RenderError> {
        if entry.render.stage < expected {
            return Err(RenderError::WrongStage {
                page_uid: entry.page_uid.clone(),
                stage: entry.render.stage,
                expected,
            });
        }
        entry
            .render
            .document_name
            .clone()
            .ok_or_else(|| RenderError::MissingDocument {
                page_uid: entry.page_uid.clone(),
            })
    }

    fn run_export(
        &self,
        step: RenderStep,
        page_uid: &str,
        document_name: &str,
        export_name: &str,
        result_type: ResultType,
    ) -> Result<(), RenderError> {
        let ticket = self
            .service
            .request_export(&self.job_id, document_name, export_name, result_type)
            .map_err(|source| RenderError::Service {
                step,
                page_uid: page_uid.to_owned(),
                source,
            })?;

        match ticket {
            ExportTicket::Completed => Ok(()),
            ExportTicket::Queued(queue_id) => self.wait_for_queue(step, page_uid, &queue_id),
        }
    }

    /// Polls the queue sequentially until a terminal state or the attempt
    /// ceiling. Sleeping blocks only the calling thread.
    fn wait_for_queue(
        &self,
        step: RenderStep,
        page_uid: &str,
        queue_id: &str,
    ) -> Result<(), RenderError> {
        for attempt in 1..=self.poll.attempts {
            let state = self
                .service
                .queue_state(queue_id)
                .map_err(|source| RenderError::Service {
                    step,
                    page_uid: page_uid.to_owned(),
                    source,
                })?;

            match state {
                QueueState::Success => {
                    debug!(queue_id, attempt; "Queue finished");
                    return Ok(());
                }
                QueueState::Error => {
                    return Err(RenderError::QueueFailed {
                        step,
                        page_uid: page_uid.to_owned(),
                        state: "error".to_owned(),
                    });
                }
                QueueState::Failed => {
                    return Err(RenderError::QueueFailed {
                        step,
                        page_uid: page_uid.to_owned(),
                        state: "failed".to_owned(),
                    });
                }
                QueueState::Pending(state) => {
                    debug!(queue_id, attempt, state = state.as_str(); "Queue pending");
                    if attempt < self.poll.attempts {
                        std::thread::sleep(self.poll.interval);
                    }
                }
            }
        }

        Err(RenderError::QueueTimeout {
            step,
            page_uid: page_uid.to_owned(),
            attempts: self.poll.attempts,
        })
    }
}

/// Zips a single artifact into an in-memory archive.
fn zip_single(file_name: &str, bytes: &[u8]) -> Result<Vec<u8>, String> {
    let cursor = std::io::Cursor::new(Vec::new());
    let mut archive = zip::ZipWriter::new(cursor);
    archive
        .start_file(file_name, zip::write::SimpleFileOptions::default())
        .map_err(|err| err.to_string())?;
    archive.write_all(bytes).map_err(|err| err.to_string())?;
    let cursor = archive.finish().map_err(|err| err.to_string())?;
    Ok(cursor.into_inner())
}
