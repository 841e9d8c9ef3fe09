//! Profiler trace discovery and loading
//!
//! The solver writes one JSON document per instance into a data directory.
//! Only files whose name carries every configured tag (by default the best
//! algorithm and best iteration exports) are analysed.

use crate::event::TraceDocument;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Whether a file name is an eligible trace document
pub fn is_eligible(file_name: &str, required_tags: &[String]) -> bool {
    file_name.ends_with(".json") && required_tags.iter().all(|tag| file_name.contains(tag.as_str()))
}

/// List eligible trace files in `dir`, sorted by path
pub fn discover_trace_files<P: AsRef<Path>>(dir: P, required_tags: &[String]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("Profiler data directory not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_eligible(name, required_tags) {
            files.push(path);
        } else {
            tracing::trace!(file = name, "Skipping ineligible file");
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse one trace document
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<TraceDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    TraceDocument::from_json_str(&content)
        .with_context(|| format!("Invalid profiler trace JSON in {}", path.display()))
}
