use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::model::{Diagnostic, DiagnosticKind, Type};

pub mod analyzer;
pub mod diagnostics;
pub mod java;
pub mod javadoc;
pub mod node_kind;

use analyzer::JavaAnalyzer;
use diagnostics::DiagnosticCollector;
use java::{ExtractedUnit, StructuralExtractor};

/// A source-to-model extractor for one language.
pub trait SourceExtractor: Send + Sync {
    /// Extract the top-level types declared in `source`, in source order.
    fn extract(&self, file_path: &str, source: &str) -> Result<Vec<Type>>;

    /// File extensions (without the dot) this extractor understands.
    fn supported_extensions(&self) -> &[&str];
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JavaSourceExtractor;

impl SourceExtractor for JavaSourceExtractor {
    fn extract(&self, file_path: &str, source: &str) -> Result<Vec<Type>> {
        extract(file_path, source)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["java"]
    }
}

/// Extract the structural model of one Java compilation unit.
///
/// Every call owns a fresh parser and diagnostic collector, so calls are
/// independent and may run concurrently. Syntax errors do not fail the
/// call: they are stamped onto every returned type (nested ones included)
/// as `has_parse_errors` and `diagnostics`. Input with no recoverable
/// structure is an error, and so is input with syntax errors from which no
/// type could be recovered.
pub fn extract(file_path: &str, source: &str) -> Result<Vec<Type>> {
    let mut analyzer = JavaAnalyzer::new()?;
    let mut diagnostics = DiagnosticCollector::new();

    debug!(path = file_path, bytes = source.len(), "parsing");
    let tree = analyzer.parse(file_path, source, &mut diagnostics)?;

    debug!(path = file_path, "extracting structure");
    let ExtractedUnit {
        package,
        imports,
        mut types,
    } = StructuralExtractor::new(source, &mut diagnostics).run(tree.root_node());

    // Syntax errors with nothing recovered leave no type to carry them.
    if types.is_empty() {
        let first_syntax = diagnostics
            .errors()
            .iter()
            .find(|d| d.kind == DiagnosticKind::Syntax);
        if let Some(first) = first_syntax {
            return Err(ExtractError::parse(file_path, first.to_string()));
        }
    }

    let has_errors = diagnostics.has_errors();
    if has_errors {
        let summary = diagnostics.summary();
        warn!(
            path = file_path,
            total = summary.total,
            first = summary.first.as_deref().unwrap_or(""),
            "extracted with diagnostics"
        );
    }

    let stamp = FileStamp {
        file_path,
        package: package.as_deref(),
        imports: &imports,
        has_errors,
        diagnostics: diagnostics.errors(),
    };
    for ty in &mut types {
        stamp.apply(ty);
    }

    debug!(path = file_path, types = types.len(), "extraction complete");
    Ok(types)
}

/// File-level facts copied onto every type declared in the file.
struct FileStamp<'a> {
    file_path: &'a str,
    package: Option<&'a str>,
    imports: &'a [String],
    has_errors: bool,
    diagnostics: &'a [Diagnostic],
}

impl FileStamp<'_> {
    fn apply(&self, ty: &mut Type) {
        ty.file_path = self.file_path.to_string();
        ty.package = self.package.map(str::to_string);
        ty.imports = self.imports.to_vec();
        ty.has_parse_errors = self.has_errors;
        ty.diagnostics = self.diagnostics.to_vec();
        for nested in &mut ty.nested_types {
            self.apply(nested);
        }
    }
}
