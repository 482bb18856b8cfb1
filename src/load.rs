//! YAML data loading.
//!
//! Both the catalog (`data/tools.yaml`) and every per-item page source are
//! plain YAML documents. They are parsed straight into [`serde_json::Value`]
//! trees: the rest of the pipeline only does best-effort key lookups, and
//! Tera takes the same type as template context.

use crate::catalog::Catalog;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed YAML in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("expected a mapping at the top level of {}", .0.display())]
    NotAMapping(PathBuf),
}

impl LoadError {
    /// Whether the error means the input file was absent, as opposed to
    /// present but unreadable or malformed.
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing(_))
    }
}

/// Parse a YAML file into a value tree.
///
/// An empty (or whitespace-only) file is `Value::Null`. Merge keys
/// (`<<: *defaults`) are applied, and mappings keep their key order.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::Missing(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let malformed = |source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    };
    let mut doc: serde_yaml::Value = serde_yaml::from_str(&content).map_err(malformed)?;
    doc.apply_merge().map_err(malformed)?;
    serde_yaml::from_value(doc).map_err(malformed)
}

/// Load a document whose root must be a mapping (or empty).
pub fn load_mapping(path: &Path) -> Result<serde_json::Map<String, Value>, LoadError> {
    match load_document(path)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(serde_json::Map::new()),
        _ => Err(LoadError::NotAMapping(path.to_path_buf())),
    }
}

/// Load the catalog data file.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    load_mapping(path).map(Catalog::new)
}
