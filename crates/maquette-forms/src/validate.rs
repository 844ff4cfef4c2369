//! Form validation: hard errors and drift warnings per spread.
//!
//! Validation is a pure function of the current field values and the
//! derived field configurations. Errors are hard constraint violations
//! that block submission (missing mandatory content, under-filled
//! arrays); warnings are soft overflow signals (too many characters or
//! items) — content is never truncated here, the layout is expected to
//! adapt downstream.

use indexmap::IndexMap;

use maquette_core::field::{FieldConfig, FieldKind, FieldValue};

/// One validation finding, tagged by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

impl Issue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The outcome of validating one spread.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Hard violations; submission is blocked while any remain.
    pub errors: Vec<Issue>,
    /// Soft overflow signals; informational only.
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// Returns true when the spread cannot be submitted.
    pub fn blocks_submission(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true when there is nothing to report.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validates one spread's values against its field configurations.
///
/// Fields are checked in configuration order. A field with no entry in
/// `values` is treated as null. Never mutates values.
pub fn validate(
    values: &IndexMap<String, FieldValue>,
    configs: &IndexMap<String, FieldConfig>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (name, config) in configs {
        let value = values.get(name).unwrap_or(&FieldValue::Null);

        if config.mandatory && value.is_empty() {
            report
                .errors
                .push(Issue::new(name, format!("`{name}` is required")));
            continue;
        }

        match config.kind {
            FieldKind::Text | FieldKind::Char => {
                check_text(name, value, config, &mut report);
            }
            FieldKind::Array => check_array(name, value, config, &mut report),
            FieldKind::Image => {}
        }
    }

    report
}

fn check_text(
    name: &str,
    value: &FieldValue,
    config: &FieldConfig,
    report: &mut ValidationReport,
) {
    let (Some(text), Some(limit)) = (value.as_text(), config.max_chars) else {
        return;
    };
    let length = text.chars().count();
    if length > limit {
        report.warnings.push(Issue::new(
            name,
            format!(
                "`{name}` is {length} characters, over the limit of {limit}; \
                 the layout will be adjusted downstream"
            ),
        ));
    }
}

fn check_array(
    name: &str,
    value: &FieldValue,
    config: &FieldConfig,
    report: &mut ValidationReport,
) {
    let Some(items) = value.as_items() else {
        return;
    };

    if let Some(min) = config.min_items {
        if items.len() < min {
            report.errors.push(Issue::new(
                name,
                format!(
                    "`{name}` requires at least {min} item(s), got {}",
                    items.len()
                ),
            ));
        }
    }

    if let Some(max) = config.max_items {
        if items.len() > max {
            report.warnings.push(Issue::new(
                name,
                format!(
                    "`{name}` has {} items, over the limit of {max}; \
                     the layout will be adjusted downstream",
                    items.len()
                ),
            ));
        }
    }

    if let Some(limit) = config.max_chars {
        for (index, item) in items.iter().enumerate() {
            let length = item.chars().count();
            if length > limit {
                report.warnings.push(Issue::new(
                    name,
                    format!(
                        "`{name}[{index}]` is {length} characters, over the \
                         limit of {limit}"
                    ),
                ));
            }
        }
    }
}
