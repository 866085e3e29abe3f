//! Manifest reading.
//!
//! A marker directory only qualifies as a candidate when its parent holds a
//! parseable manifest. Only the number of declared dependencies matters.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::error::CleanerError;

/// The dependency tables of a manifest file, name to version string.
///
/// A table whose values are not all strings fails to parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl Manifest {
    /// Number of runtime dependencies.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.as_ref().map_or(0, BTreeMap::len)
    }

    /// Number of development dependencies.
    pub fn dev_dependency_count(&self) -> usize {
        self.dev_dependencies.as_ref().map_or(0, BTreeMap::len)
    }
}

/// Reads the manifest that sits next to a marker directory.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    file_name: String,
}

impl ManifestReader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the manifest belonging to `marker_dir`.
    pub fn manifest_path(&self, marker_dir: &Path) -> PathBuf {
        marker_dir
            .parent()
            .unwrap_or(marker_dir)
            .join(&self.file_name)
    }

    /// Parse the sibling manifest of `marker_dir`.
    pub fn read_for(&self, marker_dir: &Path) -> Result<Manifest, CleanerError> {
        self.read(&self.manifest_path(marker_dir))
    }

    /// Parse a manifest file.
    pub fn read(&self, path: &Path) -> Result<Manifest, CleanerError> {
        let file = File::open(path)
            .map_err(|e| CleanerError::from_manifest_io(e, path.to_path_buf()))?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| CleanerError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for ManifestReader {
    fn default() -> Self {
        Self::new("package.json")
    }
}
