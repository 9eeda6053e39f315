//! Manifest Collector
//!
//! Scans a directory tree for manifest files and parses them. Files that
//! cannot be read or parsed are logged and left out; the batch goes on.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{CollectError, LoadError};
use crate::xml::parse_document;

/// File name searched for when none is given
pub const DEFAULT_MANIFEST_FILE: &str = "package.xml";

/// Largest manifest file the collector will read
pub const MAX_MANIFEST_BYTES: u64 = 16 * 1024 * 1024;

/// A parsed manifest and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub document: Document,
}

/// Find every file named `file_name` under `root`, sorted by path.
pub fn find_manifests(root: &Path, file_name: &str) -> Result<Vec<PathBuf>, CollectError> {
    let mut found = Vec::new();
    find_recursive(root, file_name, &mut found)?;

    // Byte order of the full path, so processing order is stable across platforms' read_dir
    found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    info!("Found {} {} file(s) under {:?}", found.len(), file_name, root);
    for path in &found {
        debug!("  {}", path.display());
    }
    Ok(found)
}

fn find_recursive(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), CollectError> {
    let read_dir_error = |source| CollectError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();

        if path.is_dir() {
            find_recursive(&path, file_name, found)?;
        } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
            found.push(path);
        }
    }

    Ok(())
}

/// Read and parse each path, keeping input order and dropping failures.
pub fn load_sources(paths: &[PathBuf]) -> Vec<SourceDocument> {
    paths
        .iter()
        .filter_map(|path| match load_source(path) {
            Ok(document) => Some(SourceDocument {
                path: path.clone(),
                document,
            }),
            Err(e) => {
                warn!("Failed to load manifest {:?}: {}", path, e);
                None
            }
        })
        .collect()
}

fn load_source(path: &Path) -> Result<Document, LoadError> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_MANIFEST_BYTES {
        return Err(LoadError::TooLarge(metadata.len()));
    }

    let content = fs::read_to_string(path)?;
    Ok(parse_document(&content)?)
}
