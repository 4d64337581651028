use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::KeyValueStore;

/// Key/value store backed by a single JSON document on disk
///
/// The file holds an object mapping each storage key to its serialized value.
/// Every `set` rewrites the whole document but keeps the other entries as they
/// are, including ones that are not strings.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    pretty: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Write the document on a single line
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let document = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(document)
    }

    fn save_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = if self.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let document = self.load_document()?;
        match document.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => {
                warn!(
                    target: "storage",
                    "Ignoring non-string entry '{}' in {}: {}",
                    key,
                    self.path.display(),
                    other
                );
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Only a document that is not a JSON object at all gets replaced
        let mut document = match self.load_document() {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    target: "storage",
                    "Replacing unreadable store {}: {:#}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
        };

        document.insert(key.to_string(), Value::String(value.to_string()));
        self.save_document(&document)?;
        debug!(target: "storage", "Saved '{}' to {}", key, self.path.display());
        Ok(())
    }
}
