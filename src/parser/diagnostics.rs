use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::model::{Diagnostic, DiagnosticKind};

/// Accumulates syntax errors and unsupported-construct events for one file.
///
/// Recording never fails and never stops analysis.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
}

/// Aggregate view over the collected diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSummary {
    pub total: usize,
    pub first: Option<String>,
    pub lines: BTreeSet<usize>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn syntax_error(&mut self, line: usize, column: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::Syntax,
            line,
            column,
            message: message.into(),
        };
        warn!("syntax error: {}", diagnostic);
        self.errors.push(diagnostic);
    }

    pub fn unsupported(&mut self, line: usize, column: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::Unsupported,
            line,
            column,
            message: message.into(),
        };
        debug!("unsupported construct: {}", diagnostic);
        self.errors.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.errors.first()
    }

    pub fn summary(&self) -> DiagnosticSummary {
        DiagnosticSummary {
            total: self.errors.len(),
            first: self.first().map(|d| d.to_string()),
            lines: self.errors.iter().map(|d| d.line).collect(),
        }
    }
}
