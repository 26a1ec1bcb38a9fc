use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Project-level settings for `jsurface scan`.
///
/// Every key is optional; command-line flags take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories (relative to the project root) that hold Java sources.
    pub source_roots: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub format: Option<OutputFormat>,
}

const CONFIG_FILENAMES: &[&str] = &[".jsurface/config.toml", "jsurface.toml"];

/// Find the config file: the explicit override if it exists, else the first
/// of the default locations present under `project_root`.
pub fn find_config_path(project_root: &Path, config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(override_path) = config_override {
        if override_path.exists() {
            return Some(override_path.to_path_buf());
        }
        return None;
    }

    CONFIG_FILENAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.exists())
}

pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_config(toml_str: &str) -> Result<ScanConfig> {
    let config: ScanConfig = toml::from_str(toml_str)?;
    Ok(config)
}

/// Load the project's config, or defaults when there is none.
///
/// An explicit `--config` path that does not exist is an error.
pub fn load_project_config(project_root: &Path, config_override: Option<&Path>) -> Result<ScanConfig> {
    match find_config_path(project_root, config_override) {
        Some(path) => load_config(&path),
        None => {
            if let Some(missing) = config_override {
                bail!("config file not found: {}", missing.display());
            }
            Ok(ScanConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
source_roots = ["src/main/java", "src/test/java"]
include = ["**/api/**"]
exclude = ["**/internal/**"]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.source_roots, vec!["src/main/java", "src/test/java"]);
        assert_eq!(config.include, vec!["**/api/**"]);
        assert_eq!(config.exclude, vec!["**/internal/**"]);
        assert_eq!(config.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(parse_config("").unwrap(), ScanConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(parse_config("sources = [\"src\"]").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(parse_config("format = \"yaml\"").is_err());
    }

    #[test]
    fn test_find_default_locations_in_order() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_path(dir.path(), None).is_none());

        std::fs::write(dir.path().join("jsurface.toml"), "").unwrap();
        assert_eq!(
            find_config_path(dir.path(), None).unwrap(),
            dir.path().join("jsurface.toml")
        );

        std::fs::create_dir(dir.path().join(".jsurface")).unwrap();
        std::fs::write(dir.path().join(".jsurface/config.toml"), "").unwrap();
        assert_eq!(
            find_config_path(dir.path(), None).unwrap(),
            dir.path().join(".jsurface/config.toml")
        );
    }

    #[test]
    fn test_load_project_config_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let config = load_project_config(dir.path(), None).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_load_project_config_missing_override_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_project_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_reports_file_on_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jsurface.toml");
        std::fs::write(&path, "include = 3").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("jsurface.toml"));
    }
}
