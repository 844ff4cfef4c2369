//! Deterministic field naming shared by derivation and rehydration.
//!
//! Field names are a function of the document's traversal order alone:
//! the role slug, suffixed `_2`, `_3`, … on repeat within one spread.
//! Derivation and rehydration both run this scheme over the identical
//! traversal, which is what lets edited values target the objects they
//! were derived from.

use indexmap::IndexMap;

/// Turns a semantic role into its field-name stem: trimmed, lowercased,
/// spaces collapsed to underscores.
pub fn slug(role: &str) -> String {
    role.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Assigns unique field names within one spread.
///
/// Counts occurrences per role slug; the first occurrence gets the bare
/// slug, later ones get `_2`, `_3`, …
#[derive(Debug, Default)]
pub struct FieldNamer {
    counters: IndexMap<String, usize>,
}

impl FieldNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the field name for the next occurrence of `role`.
    pub fn next(&mut self, role: &str) -> String {
        let stem = slug(role);
        let count = self.counters.entry(stem.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            stem
        } else {
            format!("{stem}_{count}")
        }
    }
}
