// Subtree size measurement
// One sequential pass; the first unreadable entry stops the sum

use jwalk::{Parallelism, WalkDir};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::CleanerError;

/// Bytes in one reported megabyte.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Truncating byte to megabyte conversion.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Result of measuring a subtree.
///
/// When `error` is set, `bytes` holds the sum accumulated before the failure
/// and should be treated as an undercount rather than discarded.
#[derive(Debug)]
pub struct DirSize {
    pub bytes: u64,
    pub error: Option<CleanerError>,
}

impl DirSize {
    pub fn megabytes(&self) -> u64 {
        bytes_to_mb(self.bytes)
    }

    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// Sum the sizes of every non-directory entry below `root`.
///
/// Symlinks are measured themselves and never followed. A directory whose
/// children cannot be listed counts as an unreadable entry.
pub fn dir_size(root: &Path) -> DirSize {
    if let Err(e) = fs::symlink_metadata(root) {
        return DirSize {
            bytes: 0,
            error: Some(size_error(root.to_path_buf(), e)),
        };
    }

    let entries = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry_result| match entry_result {
            Ok(mut entry) => {
                if let Some(e) = entry.read_children_error.take() {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| entry.path());
                    Some(Err(size_error(path, e)))
                } else if entry.file_type().is_dir() {
                    None
                } else {
                    Some(
                        entry
                            .metadata()
                            .map(|metadata| metadata.len())
                            .map_err(|e| size_error(entry.path(), e)),
                    )
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Some(Err(size_error(path, e)))
            }
        });

    sum_entries(entries)
}

/// Add up entry lengths until the first error.
///
/// The returned size keeps whatever was summed before the failure.
pub fn sum_entries<I>(entries: I) -> DirSize
where
    I: IntoIterator<Item = Result<u64, CleanerError>>,
{
    let mut bytes = 0u64;
    for entry in entries {
        match entry {
            Ok(len) => bytes += len,
            Err(error) => {
                return DirSize {
                    bytes,
                    error: Some(error),
                }
            }
        }
    }
    DirSize { bytes, error: None }
}

fn size_error(path: PathBuf, err: impl std::fmt::Display) -> CleanerError {
    CleanerError::SizeComputation {
        path,
        reason: err.to_string(),
    }
}
