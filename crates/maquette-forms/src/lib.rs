//! Bidirectional mapping between layout documents and form fields.
//!
//! This crate turns a nested layout document into a flat, validated form
//! model and back:
//!
//! - [`derive`] - Field Schema Derivation: document → spreads + defaults
//! - [`validate`] - Validation: values + configs → errors and warnings
//! - [`rehydrate`] - Rehydration: edited values → a new document
//!
//! Derivation and rehydration share one traversal and naming scheme
//! ([`naming`]), which is what keeps regenerated field names pointing at
//! the objects they were derived from.

pub mod derive;
pub mod naming;
pub mod rehydrate;
pub mod validate;

pub use derive::{DerivedSpread, derive_spreads};
pub use rehydrate::rehydrate;
pub use validate::{Issue, ValidationReport, validate};
