use tree_sitter::{Node, Parser, Tree};

use super::diagnostics::DiagnosticCollector;
use crate::error::{ExtractError, Result};

const SNIPPET_LEN: usize = 40;

/// Java lexer/parser boundary.
///
/// Wraps a tree-sitter parser for the Java grammar. Syntax errors show up in
/// the tree as `ERROR` and `MISSING` nodes; `parse` reports each one to the
/// collector so the rest of the pipeline only sees the tree.
pub struct JavaAnalyzer {
    parser: Parser,
}

impl JavaAnalyzer {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Parse `source` into a tree, reporting syntax errors to `diagnostics`.
    ///
    /// Fails only when no tree structure can be produced at all.
    pub fn parse(
        &mut self,
        path: &str,
        source: &str,
        diagnostics: &mut DiagnosticCollector,
    ) -> Result<Tree> {
        if source.trim().is_empty() {
            return Err(ExtractError::parse(path, "source is empty"));
        }
        if source.contains('\0') {
            return Err(ExtractError::parse(path, "source is not text"));
        }

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::parse(path, "analyzer produced no tree"))?;

        let root = tree.root_node();
        if root.is_error() {
            return Err(ExtractError::parse(
                path,
                "no recognizable Java structure",
            ));
        }
        if root.has_error() {
            report_syntax_errors(root, source, diagnostics);
        }
        Ok(tree)
    }
}

/// Report every `ERROR` and `MISSING` node under `root`, in source order.
/// Nested errors inside an already reported `ERROR` node are not repeated.
fn report_syntax_errors(root: Node, source: &str, diagnostics: &mut DiagnosticCollector) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let position = node.start_position();
        if node.is_missing() {
            diagnostics.syntax_error(
                position.row + 1,
                position.column,
                format!("missing '{}'", node.kind()),
            );
            continue;
        }
        if node.is_error() {
            diagnostics.syntax_error(
                position.row + 1,
                position.column,
                format!("unexpected '{}'", snippet(node, source)),
            );
            continue;
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

fn snippet(node: Node, source: &str) -> String {
    let text = node.utf8_text(source.as_bytes()).unwrap_or("");
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > SNIPPET_LEN {
        let cut: String = first_line.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> (Result<Tree>, DiagnosticCollector) {
        let mut analyzer = JavaAnalyzer::new().unwrap();
        let mut diagnostics = DiagnosticCollector::new();
        let tree = analyzer.parse("Test.java", source, &mut diagnostics);
        (tree, diagnostics)
    }

    #[test]
    fn test_valid_source_has_no_diagnostics() {
        let (tree, diagnostics) = analyze("class A { void m() {} }");
        assert!(tree.is_ok());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let (tree, _) = analyze("   \n\t");
        assert!(matches!(tree, Err(ExtractError::Parse { .. })));
    }

    #[test]
    fn test_binary_source_is_fatal() {
        let (tree, _) = analyze("class A {}\0\0\u{1}");
        let err = tree.unwrap_err();
        assert!(err.to_string().contains("not text"));
    }

    #[test]
    fn test_syntax_error_is_reported_with_position() {
        let (tree, diagnostics) = analyze("class A {\n  int x = ;\n}");
        assert!(tree.is_ok());
        assert!(diagnostics.has_errors());
        let first = diagnostics.first().unwrap();
        assert_eq!(first.line, 2);
    }

    #[test]
    fn test_missing_brace_is_reported() {
        let (tree, diagnostics) = analyze("class A {\n  int x;\n");
        assert!(tree.is_ok());
        assert!(diagnostics.has_errors());
    }
}
