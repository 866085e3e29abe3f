//! Cleaner configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! command-line flags.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::CleanerError;

/// Directories never descended into by default.
pub const DEFAULT_SKIP: &[&str] = &[".git"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the disposable directory to look for.
    pub marker_name: String,
    /// Manifest file expected next to each marker directory.
    pub manifest_name: String,
    /// Manifest inspection workers during discovery.
    pub scan_workers: usize,
    /// Pending marker directories the walker may queue before blocking.
    pub queue_capacity: usize,
    /// Removals allowed in flight at once.
    pub delete_concurrency: usize,
    /// Glob patterns of directory names the walker skips entirely.
    pub skip: Vec<String>,
    /// Start with every candidate unselected.
    pub invert_selection: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_name: "node_modules".to_string(),
            manifest_name: "package.json".to_string(),
            scan_workers: 10,
            queue_capacity: 100,
            delete_concurrency: 5,
            skip: DEFAULT_SKIP.iter().map(|s| s.to_string()).collect(),
            invert_selection: false,
        }
    }
}

impl Config {
    /// Default config file location, e.g. `~/.config/modsweep/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("modsweep").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, CleanerError> {
        let config: Config = toml::from_str(text).map_err(|e| CleanerError::Config {
            path: None,
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, CleanerError> {
        let text = fs::read_to_string(path).map_err(|e| CleanerError::Config {
            path: Some(path.to_path_buf()),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            CleanerError::Config { reason, .. } => CleanerError::Config {
                path: Some(path.to_path_buf()),
                reason,
            },
            other => other,
        })
    }

    /// Load the default config file, falling back to defaults when absent.
    pub fn load_default() -> Result<Self, CleanerError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), CleanerError> {
        let invalid = |reason: &str| CleanerError::Config {
            path: None,
            reason: reason.to_string(),
        };

        if self.marker_name.is_empty() {
            return Err(invalid("marker_name must not be empty"));
        }
        if self.manifest_name.is_empty() {
            return Err(invalid("manifest_name must not be empty"));
        }
        if self.scan_workers == 0 {
            return Err(invalid("scan_workers must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity must be at least 1"));
        }
        if self.delete_concurrency == 0 {
            return Err(invalid("delete_concurrency must be at least 1"));
        }
        self.skip_set()?;
        Ok(())
    }

    /// Compile the skip patterns.
    pub fn skip_set(&self) -> Result<GlobSet, CleanerError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.skip {
            let glob = Glob::new(pattern).map_err(|e| CleanerError::Config {
                path: None,
                reason: format!("invalid skip pattern '{}': {}", pattern, e),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| CleanerError::Config {
            path: None,
            reason: e.to_string(),
        })
    }
}
