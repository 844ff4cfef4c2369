//! Error types for Maquette operations.
//!
//! This module provides the main error type [`MaquetteError`] which wraps
//! the error conditions that can occur while assembling or rendering an
//! article.

use std::io;

use thiserror::Error;

use crate::render::RenderError;

/// The main error type for Maquette operations.
#[derive(Debug, Error)]
pub enum MaquetteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
