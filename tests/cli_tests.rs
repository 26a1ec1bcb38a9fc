use std::fs;
use std::path::Path;
use std::process::Command;

/// Scratch project in a temp directory; kept alive for the duration of a test.
struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    fn new() -> Self {
        Self {
            dir: tempfile::TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file relative to the project root.
    fn write_file(&self, rel_path: &str, content: &str) {
        let full = self.dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content).unwrap();
    }

    /// Run jsurface with cwd set to the project root.
    fn run(&self, args: &[&str]) -> std::process::Output {
        Command::new(env!("CARGO_BIN_EXE_jsurface"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("JSURFACE_LOG")
            .output()
            .expect("failed to run jsurface")
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "jsurface {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.stdout(args)).expect("stdout should be valid JSON")
    }
}

fn create_maven_project() -> TestProject {
    let project = TestProject::new();
    project.write_file(
        "src/main/java/shop/Order.java",
        r#"package shop;

import java.util.List;

/** An order. */
public class Order {
    private final List<Item> items;

    public Order(List<Item> items) { this.items = items; }

    public int total() { return items.size(); }

    public static class Item {}
}
"#,
    );
    project.write_file(
        "src/main/java/shop/Status.java",
        "package shop;\npublic enum Status { OPEN, PAID }\n",
    );
    project.write_file(
        "src/main/java/shop/internal/Cache.java",
        "package shop.internal;\nclass Cache {}\n",
    );
    project.write_file(
        "src/test/java/shop/OrderTest.java",
        "package shop;\nclass OrderTest {}\n",
    );
    project
}

fn qualified_names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["qualified_name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_extract_text() {
    let project = create_maven_project();
    let out = project.stdout(&["extract", "src/main/java/shop/Order.java"]);
    assert!(out.contains("/** An order. */"));
    assert!(out.contains("public class shop.Order"));
    assert!(out.contains("  private final List<Item> items\n"));
    assert!(out.contains("  public Order(List<Item> items)\n"));
    assert!(out.contains("  public int total()\n"));
    assert!(out.contains("  public static class shop.Order.Item"));
}

#[test]
fn test_extract_json() {
    let project = create_maven_project();
    let value = project.json(&["extract", "src/main/java/shop/Order.java", "--format", "json"]);
    let order = &value[0];
    assert_eq!(order["qualified_name"], "shop.Order");
    assert_eq!(order["kind"], "class");
    assert_eq!(order["package"], "shop");
    assert_eq!(order["imports"][0], "java.util.List");
    assert_eq!(order["has_parse_errors"], false);
    assert_eq!(order["fields"][0]["type_ref"]["name"], "List");
    assert_eq!(order["fields"][0]["type_ref"]["type_arguments"][0]["name"], "Item");
    assert_eq!(order["methods"][0]["is_constructor"], true);
    assert_eq!(order["nested_types"][0]["qualified_name"], "shop.Order.Item");
}

#[test]
fn test_extract_compact_is_single_line() {
    let project = create_maven_project();
    let out = project.stdout(&["extract", "src/main/java/shop/Status.java", "--format", "compact"]);
    assert_eq!(out.trim_end().lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["enum_constants"], serde_json::json!(["OPEN", "PAID"]));
}

#[test]
fn test_extract_empty_file_fails() {
    let project = TestProject::new();
    project.write_file("Empty.java", "\n\n");
    let output = project.run(&["extract", "Empty.java"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Empty.java"), "stderr: {}", stderr);
}

#[test]
fn test_extract_missing_file_fails() {
    let project = TestProject::new();
    let output = project.run(&["extract", "Nope.java"]);
    assert!(!output.status.success());
}

#[test]
fn test_scan_default_source_root() {
    let project = create_maven_project();
    let value = project.json(&["scan", "--format", "json"]);
    assert_eq!(value["files_scanned"], 3);
    let names = qualified_names(&value["types"]);
    assert_eq!(names, vec!["shop.Order", "shop.Status", "shop.internal.Cache"]);
}

#[test]
fn test_scan_explicit_path_and_roots() {
    let project = create_maven_project();
    let root = project.path().to_string_lossy().to_string();
    let value = project.json(&[
        "scan",
        &root,
        "--source-root",
        "src/main/java",
        "--source-root",
        "src/test/java",
        "--format",
        "json",
    ]);
    assert_eq!(value["files_scanned"], 4);
}

#[test]
fn test_scan_exclude() {
    let project = create_maven_project();
    let value = project.json(&["scan", "--exclude", "**/internal/**", "--format", "json"]);
    let names = qualified_names(&value["types"]);
    assert_eq!(names, vec!["shop.Order", "shop.Status"]);
}

#[test]
fn test_scan_text_summary() {
    let project = create_maven_project();
    let out = project.stdout(&["scan"]);
    assert!(out.contains("Scanned 3 files: 3 types, 0 with parse errors"));
}

#[test]
fn test_config_file_sets_defaults() {
    let project = create_maven_project();
    project.write_file(
        ".jsurface/config.toml",
        "exclude = [\"**/internal/**\"]\nformat = \"json\"\n",
    );
    let value = project.json(&["scan"]);
    assert_eq!(qualified_names(&value["types"]), vec!["shop.Order", "shop.Status"]);

    // Flags win over the file.
    let out = project.stdout(&["scan", "--format", "text"]);
    assert!(out.contains("Scanned 2 files"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let project = create_maven_project();
    let output = project.run(&["scan", "--config", "missing.toml"]);
    assert!(!output.status.success());
}

#[test]
fn test_scan_strict_exit_code() {
    let project = create_maven_project();
    project.write_file(
        "src/main/java/shop/Broken.java",
        "package shop;\npublic class Broken {\n    void m() { int = ; }\n}\n",
    );

    let lenient = project.run(&["scan"]);
    assert!(lenient.status.success());

    let strict = project.run(&["scan", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&strict.stdout);
    assert!(stdout.contains("1 with parse errors"));
    assert!(stdout.contains("! Line 3:"));
}

#[test]
fn test_scan_strict_fails_on_unrecoverable_files() {
    let project = create_maven_project();
    project.write_file("src/main/java/shop/Garbage.java", "hello world this is not java");
    project.write_file(
        "src/main/java/shop/Header.java",
        "package shop;\npublic class Header extends",
    );

    let strict = project.run(&["scan", "--strict", "--format", "json"]);
    assert_eq!(strict.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&strict.stdout).unwrap();
    let failures: Vec<&str> = value["failures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().any(|f| f.contains("Garbage.java")));
    assert!(failures.iter().any(|f| f.contains("Header.java")));
    assert_eq!(value["types"].as_array().unwrap().len(), 3);
}

#[test]
fn test_scan_reports_unreadable_structure_and_continues() {
    let project = create_maven_project();
    project.write_file("src/main/java/shop/Blank.java", "   \n");
    let output = project.run(&["scan", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["files_scanned"], 4);
    assert_eq!(value["failures"].as_array().unwrap().len(), 1);
    assert_eq!(value["types"].as_array().unwrap().len(), 3);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Blank.java"));
}
