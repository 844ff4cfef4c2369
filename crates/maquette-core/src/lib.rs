//! Maquette Core Types and Definitions
//!
//! This crate provides the foundational types for the Maquette layout
//! assembly engine. It includes:
//!
//! - **Geometry**: frames and affine transforms with their compact string
//!   codec ([`geometry`] module)
//! - **Documents**: the nested page-layout document model ([`document`]
//!   module)
//! - **Semantic roles**: editorial defaults per content role
//!   ([`semantic`] module)
//! - **Fields**: the flat, derived form-field model ([`field`] module)
//! - **HTML utilities**: story-text stripping and wrapper detection
//!   ([`html`] module)

pub mod document;
pub mod field;
pub mod geometry;
pub mod html;
pub mod semantic;
