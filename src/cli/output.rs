use serde::Serialize;

use super::commands::ScanResult;
use super::OutputFormat;
use crate::model::{Field, Modifier, Type, TypeKind};

/// Format extracted types for output.
pub fn format_types(types: &[Type], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(&types, format),
        OutputFormat::Text => {
            let mut output = String::new();
            for ty in types {
                write_type(&mut output, ty, 0);
            }
            output
        }
    }
}

/// Format the result of a project scan.
pub fn format_scan(result: &ScanResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(result, format),
        OutputFormat::Text => {
            let mut output = format_types(&result.types, format);
            output.push_str(&format!(
                "Scanned {} files: {} types, {} with parse errors ({}ms)\n",
                result.files_scanned,
                result.types.len(),
                result.files_with_errors.len(),
                result.duration_ms,
            ));
            output
        }
    }
}

/// Format any serializable value as JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Compact => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
    }
}

fn write_type(output: &mut String, ty: &Type, depth: usize) {
    let indent = "  ".repeat(depth);

    if let Some(doc) = ty.documentation.as_deref().and_then(|d| d.lines().next()) {
        output.push_str(&format!("{}/** {} */\n", indent, doc));
    }
    for annotation in &ty.annotations {
        output.push_str(&format!("{}{}\n", indent, annotation));
    }

    let mut header = String::new();
    push_modifiers(&mut header, &ty.modifiers);
    header.push_str(ty.kind.keyword());
    header.push(' ');
    header.push_str(&ty.qualified_name);
    if !ty.type_parameters.is_empty() {
        header.push_str(&format!("<{}>", ty.type_parameters.join(", ")));
    }
    if ty.kind == TypeKind::Record {
        let components: Vec<String> = ty.record_components.iter().map(|c| c.to_string()).collect();
        header.push_str(&format!("({})", components.join(", ")));
    }
    if let Some(ref superclass) = ty.superclass {
        header.push_str(&format!(" extends {}", superclass));
    }
    if !ty.interfaces.is_empty() {
        let keyword = if ty.kind == TypeKind::Interface {
            "extends"
        } else {
            "implements"
        };
        let names: Vec<String> = ty.interfaces.iter().map(|i| i.to_string()).collect();
        header.push_str(&format!(" {} {}", keyword, names.join(", ")));
    }
    output.push_str(&format!("{}{}  (line {})\n", indent, header, ty.line));

    if !ty.enum_constants.is_empty() {
        output.push_str(&format!("{}  constants: {}\n", indent, ty.enum_constants.join(", ")));
    }
    for field in &ty.fields {
        output.push_str(&format!("{}  {}\n", indent, field_line(field)));
    }
    for method in &ty.methods {
        output.push_str(&format!("{}  {}\n", indent, method.signature()));
    }
    for nested in &ty.nested_types {
        write_type(output, nested, depth + 1);
    }

    // Diagnostics are file-level; list them once, under the top-level type.
    if depth == 0 {
        for diagnostic in &ty.diagnostics {
            output.push_str(&format!("{}  ! {}\n", indent, diagnostic));
        }
    }
}

fn field_line(field: &Field) -> String {
    let mut line = String::new();
    for annotation in &field.annotations {
        line.push_str(&format!("{} ", annotation));
    }
    push_modifiers(&mut line, &field.modifiers);
    line.push_str(&format!("{} {}", field.type_ref, field.name));
    if let Some(ref init) = field.initializer {
        line.push_str(&format!(" = {}", init));
    }
    line
}

fn push_modifiers(out: &mut String, modifiers: &[Modifier]) {
    for modifier in modifiers {
        out.push_str(modifier.as_str());
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract;

    fn sample() -> Vec<Type> {
        extract(
            "Sample.java",
            r#"
package demo;

/** A sample service. */
@Service
public class Sample<T> extends Base implements Runnable {
    public static final int LIMIT = 10;
    public Sample(T seed) {}
    public void run() {}
    enum Mode { FAST, SLOW }
}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_text_format() {
        let text = format_types(&sample(), OutputFormat::Text);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "/** A sample service. */");
        assert_eq!(lines[1], "@Service");
        assert!(lines[2].starts_with("public class demo.Sample<T> extends Base implements Runnable"));
        assert!(text.contains("  public static final int LIMIT = 10\n"));
        assert!(text.contains("  public Sample(T seed)\n"));
        assert!(text.contains("  public void run()\n"));
        assert!(text.contains("  enum demo.Sample.Mode"));
        assert!(text.contains("    constants: FAST, SLOW\n"));
    }

    #[test]
    fn test_json_formats() {
        let types = sample();
        let pretty = format_types(&types, OutputFormat::Json);
        let compact = format_types(&types, OutputFormat::Compact);
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value[0]["qualified_name"], "demo.Sample");
        assert_eq!(value[0]["kind"], "class");
        assert_eq!(value[0]["nested_types"][0]["kind"], "enum");
    }

    #[test]
    fn test_text_lists_diagnostics_once() {
        let types = extract("B.java", "class B { class C { void m() { int = ; } } }").unwrap();
        let text = format_types(&types, OutputFormat::Text);
        let count = text.lines().filter(|l| l.trim_start().starts_with("! ")).count();
        assert_eq!(count, types[0].diagnostics.len());
        assert!(count > 0);
    }
}
