//! Fixture loading.
//!
//! The oracles read example payloads and template definitions through
//! [`PayloadLoader`]. [`FsLoader`] resolves them below a fixture directory:
//!
//! ```text
//! <root>/error/payload.json     load_data("error/payload.json")
//! <root>/valid/error.json       load_valid_data("error")
//! <root>/fields/fields.yml      load_fields("fields/fields.yml")
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::HarnessError;
use crate::fields::FieldDescriptor;

/// Template file names picked up by [`FsLoader::discover_templates`].
pub const TEMPLATE_FILE_NAMES: &[&str] = &["fields.yml", "fields.yaml"];

pub trait PayloadLoader {
    /// Load a stored example payload.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if the payload cannot be read or parsed.
    fn load_data(&self, path: &Path) -> Result<Value, HarnessError>;

    /// Load the canonical valid payload registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if the payload cannot be read or parsed.
    fn load_valid_data(&self, name: &str) -> Result<Value, HarnessError>;

    /// Load a template definition file.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if the template cannot be read or parsed.
    fn load_fields(&self, path: &Path) -> Result<Vec<FieldDescriptor>, HarnessError>;
}

/// Loader reading fixtures from a directory tree.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read(&self, path: &Path) -> Result<(PathBuf, String), HarnessError> {
        let resolved = self.resolve(path);
        debug!(path = %resolved.display(), "loading fixture");
        let content = fs::read_to_string(&resolved).map_err(|e| HarnessError::Load {
            path: resolved.display().to_string(),
            message: e.to_string(),
        })?;
        Ok((resolved, content))
    }

    fn read_json(&self, path: &Path) -> Result<Value, HarnessError> {
        let (resolved, content) = self.read(path)?;
        serde_json::from_str(&content).map_err(|e| HarnessError::Parse {
            path: resolved.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Find every template definition file below `dir`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Load`] if the directory cannot be traversed.
    pub fn discover_templates(&self, dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
        let dir = self.resolve(dir);
        let mut found = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|e| HarnessError::Load {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
            let is_template = entry
                .file_name()
                .to_str()
                .is_some_and(|name| TEMPLATE_FILE_NAMES.contains(&name));
            if entry.file_type().is_file() && is_template {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }
}

impl PayloadLoader for FsLoader {
    fn load_data(&self, path: &Path) -> Result<Value, HarnessError> {
        self.read_json(path)
    }

    fn load_valid_data(&self, name: &str) -> Result<Value, HarnessError> {
        self.read_json(&Path::new("valid").join(format!("{name}.json")))
    }

    fn load_fields(&self, path: &Path) -> Result<Vec<FieldDescriptor>, HarnessError> {
        let (resolved, content) = self.read(path)?;
        serde_saphyr::from_str(&content).map_err(|e| HarnessError::Parse {
            path: resolved.display().to_string(),
            message: e.to_string(),
        })
    }
}
