//! Discovered candidates and their ranking.

use std::cmp::Reverse;
use std::fmt;
use std::path::PathBuf;

use super::manifest::Manifest;

/// A manifest-backed marker directory eligible for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path of the marker directory.
    pub path: PathBuf,
    /// Truncated megabytes, filled in after discovery.
    pub size_mb: u64,
    /// Set when sizing stopped early and `size_mb` may be an undercount.
    pub size_error: bool,
    pub dependencies: usize,
    pub dev_dependencies: usize,
}

impl Candidate {
    pub fn new(path: PathBuf, dependencies: usize, dev_dependencies: usize) -> Self {
        Self {
            path,
            size_mb: 0,
            size_error: false,
            dependencies,
            dev_dependencies,
        }
    }

    pub fn from_manifest(path: PathBuf, manifest: &Manifest) -> Self {
        Self::new(
            path,
            manifest.dependency_count(),
            manifest.dev_dependency_count(),
        )
    }

    /// Ranking key: runtime plus development dependencies.
    pub fn combined_dependencies(&self) -> usize {
        self.dependencies + self.dev_dependencies
    }

    /// Label shown by selectors.
    pub fn label(&self) -> String {
        format!(
            "{} ({}MB, {} dependencies)",
            self.path.display(),
            self.size_mb,
            self.combined_dependencies()
        )
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Sort candidates by combined dependency count, highest first.
///
/// `sort_by_key` is stable, so equal counts keep their discovery order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| Reverse(c.combined_dependencies()));
}

/// Sum of the precomputed sizes of `candidates`.
pub fn total_size_mb(candidates: &[Candidate]) -> u64 {
    candidates.iter().map(|c| c.size_mb).sum()
}
