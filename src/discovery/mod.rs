use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use tracing::{debug, warn};

/// A Java source file found under one of the project's source roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
}

/// Configuration for file discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Source roots relative to the project (empty means the Maven default).
    pub source_roots: Vec<String>,
    /// Glob patterns to include (empty means include all).
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

pub const DEFAULT_SOURCE_ROOT: &str = "src/main/java";

/// Build output and IDE directories that never hold hand-written sources.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["target/", "build/", "out/", ".gradle/", ".idea/"];

/// Resolve the directories to walk.
///
/// Configured roots that do not exist are skipped with a warning. Without
/// configured roots, `src/main/java` is used when present, else the project
/// root itself.
pub fn source_roots(root: &Path, config: &DiscoveryConfig) -> Vec<PathBuf> {
    if !config.source_roots.is_empty() {
        return config
            .source_roots
            .iter()
            .map(|r| root.join(r))
            .filter(|p| {
                let exists = p.is_dir();
                if !exists {
                    warn!(root = %p.display(), "source root does not exist");
                }
                exists
            })
            .collect();
    }

    let conventional = root.join(DEFAULT_SOURCE_ROOT);
    if conventional.is_dir() {
        vec![conventional]
    } else {
        vec![root.to_path_buf()]
    }
}

/// Discover `.java` files under the project's source roots, respecting
/// .gitignore, sorted by path.
pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<DiscoveredFile>> {
    let roots = source_roots(root, config);
    let Some((first, rest)) = roots.split_first() else {
        return Ok(Vec::new());
    };

    let mut builder = WalkBuilder::new(first);
    for extra in rest {
        builder.add(extra);
    }
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true);

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_EXCLUDE_PATTERNS {
        overrides
            .add(&format!("!{}", pattern))
            .context("invalid default exclude pattern")?;
    }
    for pattern in &config.exclude {
        overrides
            .add(&format!("!{}", pattern))
            .with_context(|| format!("invalid exclude pattern '{}'", pattern))?;
    }
    for pattern in &config.include {
        overrides
            .add(pattern)
            .with_context(|| format!("invalid include pattern '{}'", pattern))?;
    }
    builder.overrides(overrides.build().context("failed to build overrides")?);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error reading directory entry")?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("java") {
            continue;
        }
        files.push(DiscoveredFile {
            path: path.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup();
    debug!(count = files.len(), roots = roots.len(), "discovered java files");
    Ok(files)
}
