// Marker directory discovery
// Producer-consumer: one walker feeds a bounded queue drained by manifest workers

use crossbeam_channel::{bounded, Sender};
use globset::GlobSet;
use jwalk::WalkDir;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use super::candidate::Candidate;
use super::config::Config;
use super::error::CleanerError;
use super::manifest::ManifestReader;
use super::report::{Event, Reporter};

/// Outcome of a discovery pass.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidates in merge order. Not ranked.
    pub candidates: Vec<Candidate>,
    /// Marker directories excluded because of their manifest.
    pub skipped: usize,
    /// Branches of the tree that could not be walked.
    pub walk_errors: Vec<CleanerError>,
}

/// Walks a tree looking for marker directories with a sibling manifest.
pub struct Scanner {
    root: PathBuf,
    workers: usize,
    config: Arc<Config>,
    skip: GlobSet,
}

impl Scanner {
    /// Create a scanner for `root` using the worker and queue sizes from `config`.
    pub fn new(root: PathBuf, config: Arc<Config>) -> Result<Self, CleanerError> {
        let skip = config.skip_set()?;
        Ok(Self {
            root,
            workers: config.scan_workers.max(1),
            config,
            skip,
        })
    }

    /// Override the number of manifest workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover every candidate below the root.
    ///
    /// Returns once the walker has finished and every worker has drained the
    /// queue. Walk errors are collected rather than aborting the scan.
    pub fn scan(&self, reporter: &dyn Reporter) -> ScanResult {
        let (sender, receiver) = bounded::<PathBuf>(self.config.queue_capacity.max(1));
        let reader = ManifestReader::new(self.config.manifest_name.clone());
        let found = Mutex::new(Vec::new());
        let skipped = AtomicUsize::new(0);

        let walk_errors = thread::scope(|s| {
            for _ in 0..self.workers {
                let receiver = receiver.clone();
                let reader = &reader;
                let found = &found;
                let skipped = &skipped;

                s.spawn(move || {
                    for marker in receiver.iter() {
                        match reader.read_for(&marker) {
                            Ok(manifest) => {
                                let candidate = Candidate::from_manifest(marker, &manifest);
                                reporter.report(Event::Discovered {
                                    path: candidate.path.clone(),
                                    dependencies: candidate.dependencies,
                                    dev_dependencies: candidate.dev_dependencies,
                                });
                                found
                                    .lock()
                                    .unwrap_or_else(|e| e.into_inner())
                                    .push(candidate);
                            }
                            Err(error) => {
                                skipped.fetch_add(1, Ordering::Relaxed);
                                reporter.report(Event::Skipped { path: marker, error });
                            }
                        }
                    }
                });
            }
            drop(receiver);

            // Dropping the sender inside walk closes the queue; the scope then
            // joins every worker.
            self.walk(sender)
        });

        ScanResult {
            candidates: found.into_inner().unwrap_or_else(|e| e.into_inner()),
            skipped: skipped.into_inner(),
            walk_errors,
        }
    }

    /// Producer side: push marker directories onto the queue without
    /// descending into them. Blocks while the queue is full.
    fn walk(&self, sender: Sender<PathBuf>) -> Vec<CleanerError> {
        let mut errors = Vec::new();
        let marker_name = OsString::from(&self.config.marker_name);

        if let Err(e) = fs::symlink_metadata(&self.root) {
            errors.push(CleanerError::Traversal {
                path: Some(self.root.clone()),
                reason: e.to_string(),
            });
            return errors;
        }

        if self.root.file_name() == Some(marker_name.as_os_str()) {
            let _ = sender.send(self.root.clone());
            return errors;
        }

        let marker = marker_name.clone();
        let skip = self.skip.clone();

        let walker = WalkDir::new(&self.root)
            .skip_hidden(false)
            .follow_links(false)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) => !(entry.file_type.is_dir() && skip.is_match(&entry.file_name)),
                    Err(_) => true,
                });
                for entry in children.iter_mut().flatten() {
                    if entry.file_type.is_dir() && entry.file_name == marker {
                        entry.read_children_path = None;
                    }
                }
            });

        for entry_result in walker {
            match entry_result {
                Ok(mut entry) => {
                    // An unlistable directory arrives as an entry carrying its error
                    if let Some(e) = entry.read_children_error.take() {
                        errors.push(CleanerError::from_walk_error(e));
                    }
                    if entry.depth == 0 || !entry.file_type().is_dir() {
                        continue;
                    }
                    if entry.file_name() == marker_name.as_os_str() {
                        if sender.send(entry.path()).is_err() {
                            // Every worker is gone
                            break;
                        }
                    }
                }
                Err(e) => errors.push(CleanerError::from_walk_error(e)),
            }
        }

        errors
    }
}
