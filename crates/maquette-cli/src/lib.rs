//! CLI logic for the Maquette layout tool.
//!
//! This module contains the core CLI logic: deriving form fields from a
//! layout document, validating and applying edits, sequencing an
//! article's pages, and driving the rendering service.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};
pub use config::ConfigError;

use std::fs;

use indexmap::IndexMap;
use log::{info, warn};
use thiserror::Error;

use maquette::article::ArticleResource;
use maquette::document::LayoutDocument;
use maquette::field::FieldValue;
use maquette::plan::PlanChange;
use maquette::render::client::HttpDesignService;
use maquette::render::{PollPolicy, RenderError, RenderOrchestrator};
use maquette::{MaquetteError, ValidationReport, derive_spreads, rehydrate, validate};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Maquette(#[from] MaquetteError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed with {count} error(s)")]
    ValidationFailed {
        report: ValidationReport,
        count: usize,
    },
}

/// Run the Maquette CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed layout, values, or article JSON
/// - Validation failures (submission-blocking issues)
/// - Rendering-service failures
pub fn run(args: &Args) -> Result<(), CliError> {
    match &args.command {
        Command::Fields {
            layout,
            two_pager,
            output,
        } => run_fields(layout, *two_pager, output.as_deref()),
        Command::Validate {
            layout,
            values,
            two_pager,
        } => run_validate(layout, values, *two_pager),
        Command::Apply {
            layout,
            values,
            images,
            two_pager,
            output,
        } => run_apply(layout, values, images.as_deref(), *two_pager, output),
        Command::Plan {
            article,
            reorder,
            remove,
            output,
        } => run_plan(article, reorder.as_deref(), *remove, output.as_deref()),
        Command::Render {
            article,
            job,
            page,
            merge,
        } => run_render(args, article, job.as_deref(), page.as_deref(), *merge),
    }
}

fn load_layout(path: &str) -> Result<LayoutDocument, CliError> {
    let json = fs::read_to_string(path)?;
    Ok(LayoutDocument::from_json_str(&json)?)
}

fn load_values(path: &str) -> Result<IndexMap<String, FieldValue>, CliError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn run_fields(layout: &str, two_pager: bool, output: Option<&str>) -> Result<(), CliError> {
    let document = load_layout(layout)?;
    let spreads = derive_spreads(&document, two_pager, layout);

    let rendered = serde_json::to_string_pretty(
        &spreads
            .iter()
            .map(|derived| {
                serde_json::json!({
                    "fields": derived.spread.fields,
                    "defaults": derived.defaults,
                })
            })
            .collect::<Vec<_>>(),
    )?;

    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Field schema written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_validate(layout: &str, values_path: &str, two_pager: bool) -> Result<(), CliError> {
    let document = load_layout(layout)?;
    let values = load_values(values_path)?;

    let spreads = derive_spreads(&document, two_pager, layout);
    let mut report = ValidationReport::default();
    for derived in &spreads {
        let partial = validate(&values, &derived.spread.fields);
        report.errors.extend(partial.errors);
        report.warnings.extend(partial.warnings);
    }

    for warning in &report.warnings {
        warn!(field = warning.field.as_str(); "{}", warning.message);
    }

    if report.blocks_submission() {
        let count = report.errors.len();
        return Err(CliError::ValidationFailed { report, count });
    }

    info!(
        fields = spreads.iter().map(|s| s.spread.fields.len()).sum::<usize>(),
        warnings = report.warnings.len();
        "Validation passed"
    );
    Ok(())
}

fn run_apply(
    layout: &str,
    values_path: &str,
    images_path: Option<&str>,
    two_pager: bool,
    output: &str,
) -> Result<(), CliError> {
    let document = load_layout(layout)?;
    let values = load_values(values_path)?;
    let image_urls: IndexMap<String, String> = match images_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => IndexMap::new(),
    };

    let updated = rehydrate(&document, two_pager, &values, &image_urls);
    fs::write(output, updated.to_json_string().map_err(MaquetteError::Json)?)?;

    info!(output_file = output; "Rehydrated layout written");
    Ok(())
}

fn run_plan(
    article_path: &str,
    reorder: Option<&[String]>,
    remove: Option<usize>,
    output: Option<&str>,
) -> Result<(), CliError> {
    let article = ArticleResource::from_json_str(&fs::read_to_string(article_path)?)?;
    let mut plan = article.to_plan();

    if let Some(index) = remove {
        match plan.remove(index) {
            PlanChange::PageCountChanged { previous, current } => {
                info!(previous, current; "Page removed");
            }
            _ => warn!(index; "Remove was a no-op"),
        }
    }

    if let Some(order) = reorder {
        if plan.reorder(order) == PlanChange::None {
            warn!("Reorder was a no-op; uid list must match the plan exactly");
        }
    }

    for entry in plan.entries() {
        let kind = match entry.kind {
            maquette::plan::PageKind::OnePager => "1 pager",
            maquette::plan::PageKind::TwoPager => "2 pager",
        };
        println!(
            "#{:<3} {:<8} layout {:<6} {}",
            entry.page_number, kind, entry.layout_id, entry.page_uid
        );
    }

    if let Some(path) = output {
        let mut snapshot = ArticleResource::from_plan(&article.article_id, &plan);
        snapshot.status = article.status;
        fs::write(path, snapshot.to_json_string()?)?;
        info!(output_file = path; "Article written");
    }
    Ok(())
}

fn run_render(
    args: &Args,
    article_path: &str,
    job: Option<&str>,
    page: Option<&str>,
    merge: bool,
) -> Result<(), CliError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let article = ArticleResource::from_json_str(&fs::read_to_string(article_path)?)?;
    let mut plan = article.to_plan();

    // One job id per article keeps every page in the same remote
    // workspace.
    let job_id = job
        .map(str::to_owned)
        .unwrap_or_else(|| format!("maq-{}", article.article_id));

    let service = HttpDesignService::new(app_config.service());
    let orchestrator = RenderOrchestrator::new(
        service,
        job_id,
        PollPolicy::from(app_config.service()),
    );

    match page {
        Some(uid) => {
            let entry = plan
                .by_uid_mut(uid)
                .ok_or_else(|| MaquetteError::Plan(format!("article has no page {uid}")))?;
            orchestrator.process_page(entry)?;
        }
        None => orchestrator.process_article(&mut plan)?,
    }

    for entry in plan.entries() {
        if let Some(url) = &entry.render.designer_url {
            println!("{} designer: {url}", entry.page_uid);
        }
        if let Some(url) = &entry.render.pdf_download_url {
            println!("{} pdf:      {url}", entry.page_uid);
        }
    }

    if merge {
        let combined = orchestrator.merge(&plan)?;
        println!("merged pdf: {combined}");
    }
    Ok(())
}
