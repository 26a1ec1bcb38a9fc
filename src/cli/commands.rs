use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::discovery::{discover_files, DiscoveryConfig};
use crate::model::Type;
use crate::parser::{JavaSourceExtractor, SourceExtractor};

/// Extract one file.
pub fn run_extract(file: &Path) -> Result<Vec<Type>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let path = file.to_string_lossy();
    let types = JavaSourceExtractor.extract(&path, &source)?;
    Ok(types)
}

/// Outcome of extracting every file of a project.
#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub files_scanned: usize,
    /// Files whose types carry at least one diagnostic.
    pub files_with_errors: Vec<String>,
    /// Files that could not be read or from which no type was recovered.
    pub failures: Vec<String>,
    pub types: Vec<Type>,
    pub duration_ms: u128,
}

impl ScanResult {
    pub fn has_errors(&self) -> bool {
        !self.files_with_errors.is_empty() || !self.failures.is_empty()
    }
}

/// Discover and extract a project's Java files in parallel.
///
/// Types are returned in discovery order. A failing file is recorded in
/// `failures` and does not stop the scan.
pub fn run_scan(project_path: &Path, config: &DiscoveryConfig) -> Result<ScanResult> {
    let start = Instant::now();
    let discovered = discover_files(project_path, config)?;
    debug!(files = discovered.len(), "scanning");

    let extractor = JavaSourceExtractor;
    let results: Vec<(String, Result<Vec<Type>>)> = discovered
        .par_iter()
        .map(|df| {
            let path_str = df.path.to_string_lossy().to_string();
            let result = std::fs::read_to_string(&df.path)
                .with_context(|| format!("failed to read {}", df.path.display()))
                .and_then(|source| {
                    extractor
                        .extract(&path_str, &source)
                        .map_err(anyhow::Error::from)
                });
            (path_str, result)
        })
        .collect();

    let mut types = Vec::new();
    let mut files_with_errors = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(file_types) => {
                if file_types.iter().any(|t| t.has_parse_errors) {
                    files_with_errors.push(path);
                }
                types.extend(file_types);
            }
            Err(e) => {
                warn!(path = %path, error = %e, "skipping file");
                failures.push(format!("{}: {:#}", path, e));
            }
        }
    }

    Ok(ScanResult {
        files_scanned: discovered.len(),
        files_with_errors,
        failures,
        types,
        duration_ms: start.elapsed().as_millis(),
    })
}
