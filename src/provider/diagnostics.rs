//! Diagnostics returned to the plugin runtime.

use serde::Serialize;

use crate::error::ProviderError;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single user-facing message attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl ProviderError {
    /// Wraps this error as an error diagnostic under `summary`, with the error
    /// text as detail.
    pub fn to_diagnostic(&self, summary: impl Into<String>) -> Diagnostic {
        Diagnostic::error(summary, self.to_string())
    }
}

/// Ordered collection of diagnostics for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DockerError;

    #[test]
    fn test_has_error() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_error());

        diagnostics.push(Diagnostic::warning("Replacement", "name changed"));
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.len(), 1);

        diagnostics.push(Diagnostic::error("Failure", "boom"));
        assert!(diagnostics.has_error());
    }

    #[test]
    fn test_provider_error_to_diagnostic() {
        let err = ProviderError::from(DockerError::Conflict(
            "network with name testcrud already exists".to_string(),
        ));
        let diagnostic = err.to_diagnostic("Unable to Create Docker Network");
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.summary, "Unable to Create Docker Network");
        assert!(diagnostic.detail.contains("already exists"));
    }

    #[test]
    fn test_serialize() {
        let diagnostics = Diagnostics::from(Diagnostic::error("Failure", "boom"));
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"severity": "error", "summary": "Failure", "detail": "boom"}])
        );
    }
}
