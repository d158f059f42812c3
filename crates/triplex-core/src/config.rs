//! # Store Configuration
//!
//! Runtime settings handed to [`Store::open`](crate::store::Store::open) and
//! the store factories. Loaded from TOML:
//!
//! ```toml
//! context_aware = true
//! formula_aware = true
//! snapshot_path = "data/store.tplx"
//! default_context = "http://example.org/default"
//! ```
//!
//! Every key is optional.

use crate::TriplexError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Keep named contexts apart. When false every context collapses onto
    /// the default context.
    pub context_aware: bool,
    /// Accept quoted (unasserted) triples.
    pub formula_aware: bool,
    /// Snapshot file loaded by `open` and written by `close`/`commit`.
    pub snapshot_path: Option<PathBuf>,
    /// IRI of the default context. A fresh blank node when absent.
    pub default_context: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            context_aware: true,
            formula_aware: true,
            snapshot_path: None,
            default_context: None,
        }
    }
}

impl StoreConfig {
    /// Configuration for a store that ignores contexts and formulas.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            context_aware: false,
            formula_aware: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, TriplexError> {
        toml::from_str(source).map_err(|e| TriplexError::Configuration(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, TriplexError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| TriplexError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = StoreConfig::from_toml_str("").expect("parse");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn partial_document() {
        let config = StoreConfig::from_toml_str(
            "context_aware = false\nsnapshot_path = \"/tmp/s.tplx\"\n",
        )
        .expect("parse");
        assert!(!config.context_aware);
        assert!(config.formula_aware);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/s.tplx")));
    }

    #[test]
    fn wrong_type_is_configuration_error() {
        let result = StoreConfig::from_toml_str("context_aware = \"yes\"");
        assert!(matches!(result, Err(TriplexError::Configuration(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "default_context = \"http://e/ctx\"").expect("write");
        let config = StoreConfig::load(&path).expect("load");
        assert_eq!(config.default_context.as_deref(), Some("http://e/ctx"));
    }
}
