use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::Node;

fn leading_star() -> &'static Regex {
    static LEADING_STAR: OnceLock<Regex> = OnceLock::new();
    LEADING_STAR.get_or_init(|| Regex::new(r"^\s*\*\s?").expect("valid regex"))
}

/// Strip `/** */` markers and per-line `*` prefixes, dropping blank lines.
pub fn clean(comment: &str) -> String {
    let body = comment.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .map(|line| leading_star().replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Doc comment attached to a declaration: the nearest preceding `/** */`
/// block comment, looking past line comments only.
pub fn preceding_doc(node: Node, source: &str) -> Option<String> {
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev {
        match sibling.kind() {
            "block_comment" => {
                let text = sibling.utf8_text(source.as_bytes()).ok()?;
                if !text.starts_with("/**") {
                    return None;
                }
                let cleaned = clean(text);
                return if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned)
                };
            }
            "line_comment" => prev = sibling.prev_sibling(),
            _ => return None,
        }
    }
    None
}
