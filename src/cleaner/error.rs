// Centralized error handling for the cleaner pipeline
// Every failure is a value; only RootResolution and Config abort a run

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while discovering, measuring and removing candidates
#[derive(Debug)]
pub enum CleanerError {
    /// The starting directory could not be determined
    RootResolution { path: Option<PathBuf>, source: io::Error },

    /// A walk step failed on one branch of the tree
    Traversal { path: Option<PathBuf>, reason: String },

    /// Manifest errors
    ManifestMissing { path: PathBuf },
    ManifestRead { path: PathBuf, source: io::Error },
    ManifestParse { path: PathBuf, source: serde_json::Error },

    /// An entry's metadata was unreadable while summing a subtree
    SizeComputation { path: PathBuf, reason: String },

    /// A removal failed for a chosen candidate
    Deletion { path: PathBuf, source: io::Error },

    /// The selection collaborator failed; nothing is removed
    Selection { reason: String },

    /// Configuration file or value errors
    Config { path: Option<PathBuf>, reason: String },
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CleanerError::RootResolution { path, source } => match path {
                Some(p) => write!(f, "Cannot resolve starting directory {}: {}", p.display(), source),
                None => write!(f, "Cannot determine current working directory: {}", source),
            },
            CleanerError::Traversal { path, reason } => match path {
                Some(p) => write!(f, "Error walking {}: {}", p.display(), reason),
                None => write!(f, "Error walking directory: {}", reason),
            },
            CleanerError::ManifestMissing { path } => {
                write!(f, "Manifest not found: {}", path.display())
            }
            CleanerError::ManifestRead { path, source } => {
                write!(f, "Cannot read manifest {}: {}", path.display(), source)
            }
            CleanerError::ManifestParse { path, source } => {
                write!(f, "Cannot parse manifest {}: {}", path.display(), source)
            }
            CleanerError::SizeComputation { path, reason } => {
                write!(f, "Cannot read metadata for {}: {}", path.display(), reason)
            }
            CleanerError::Deletion { path, source } => {
                write!(f, "Error removing {}: {}", path.display(), source)
            }
            CleanerError::Selection { reason } => {
                write!(f, "Error during selection: {}", reason)
            }
            CleanerError::Config { path, reason } => match path {
                Some(p) => write!(f, "Invalid configuration in {}: {}", p.display(), reason),
                None => write!(f, "Invalid configuration: {}", reason),
            },
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CleanerError::RootResolution { source, .. } => Some(source),
            CleanerError::ManifestRead { source, .. } => Some(source),
            CleanerError::ManifestParse { source, .. } => Some(source),
            CleanerError::Deletion { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl CleanerError {
    /// Classify an I/O error raised while opening a manifest
    pub fn from_manifest_io(err: io::Error, path: PathBuf) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CleanerError::ManifestMissing { path },
            _ => CleanerError::ManifestRead { path, source: err },
        }
    }

    /// Convert a jwalk error into a traversal error, keeping the offending path
    pub fn from_walk_error(err: jwalk::Error) -> Self {
        CleanerError::Traversal {
            path: err.path().map(|p| p.to_path_buf()),
            reason: err.to_string(),
        }
    }

    /// Whether this error should terminate the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, CleanerError::RootResolution { .. } | CleanerError::Config { .. })
    }
}
