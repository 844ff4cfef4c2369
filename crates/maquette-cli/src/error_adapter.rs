//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a validation run produces multiple per-field issues, each issue
//! is rendered independently as its own diagnostic, warnings with warning
//! severity.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, Severity};

use maquette::ValidationReport;

use crate::CliError;

/// Adapter for a single per-field validation issue.
pub struct IssueAdapter {
    message: String,
    severity: Severity,
}

impl IssueAdapter {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Debug for IssueAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueAdapter")
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for IssueAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IssueAdapter {}

impl MietteDiagnostic for IssueAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("maquette::validation"))
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }
}

/// Adapter for non-validation [`CliError`] variants.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Maquette(_) => "maquette::library",
            CliError::Render(_) => "maquette::render",
            CliError::Config(_) => "maquette::config",
            CliError::Io(_) => "maquette::io",
            CliError::Json(_) => "maquette::json",
            CliError::ValidationFailed { .. } => return None,
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A per-field validation issue.
    Issue(IssueAdapter),
    /// A plain error without per-field structure.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Issue(issue) => fmt::Display::fmt(issue, f),
            Reportable::Error(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Issue(_) => None,
            Reportable::Error(error) => error.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(issue) => issue.code(),
            Reportable::Error(error) => error.code(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Issue(issue) => issue.severity(),
            Reportable::Error(error) => error.severity(),
        }
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
///
/// For [`CliError::ValidationFailed`], this returns one [`Reportable`]
/// per issue — errors first, then warnings. For other error variants,
/// this returns a single [`Reportable`].
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::ValidationFailed { report, .. } => report_to_reportables(report),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Convert a [`ValidationReport`] into reportables, errors before
/// warnings.
pub fn report_to_reportables(report: &ValidationReport) -> Vec<Reportable<'static>> {
    let errors = report
        .errors
        .iter()
        .map(|issue| Reportable::Issue(IssueAdapter::new(&issue.message, Severity::Error)));
    let warnings = report
        .warnings
        .iter()
        .map(|issue| Reportable::Issue(IssueAdapter::new(&issue.message, Severity::Warning)));
    errors.chain(warnings).collect()
}

#[cfg(test)]
mod tests {
    use maquette::{MaquetteError, ValidationReport};

    use super::*;

    fn report() -> ValidationReport {
        use indexmap::IndexMap;
        use maquette::field::{FieldConfig, FieldValue};

        let mut configs: IndexMap<String, FieldConfig> = IndexMap::new();
        configs.insert("headline".to_owned(), FieldConfig::text(80, true));
        configs.insert("body_copy".to_owned(), FieldConfig::text(5, false));
        let mut values: IndexMap<String, FieldValue> = IndexMap::new();
        values.insert("body_copy".to_owned(), FieldValue::Text("too long".into()));
        maquette::validate(&values, &configs)
    }

    #[test]
    fn test_validation_failure_yields_one_reportable_per_issue() {
        let report = report();
        let err = CliError::ValidationFailed {
            count: report.errors.len(),
            report,
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert!(reportables[0].to_string().contains("headline"));
        assert_eq!(reportables[0].severity(), Some(Severity::Error));
        assert_eq!(reportables[1].severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_non_validation_error_is_single_reportable() {
        let err = CliError::Maquette(MaquetteError::Plan("no page at index 3".to_owned()));
        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(error) => {
                assert_eq!(error.to_string(), "Plan error: no page at index 3");
            }
            Reportable::Issue(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_codes() {
        let err = CliError::Maquette(MaquetteError::Plan("x".to_owned()));
        let reportables = to_reportables(&err);
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()),
            Some("maquette::library".to_owned())
        );
    }
}
