//! Concurrent removal of chosen candidates.
//!
//! A counting semaphore limits how many recursive removals run at once.
//! Each removal owns its permit and releases it when it returns, whatever the
//! outcome. One failure never stops the others.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};

use super::candidate::Candidate;
use super::error::CleanerError;
use super::report::{Event, Reporter};
use super::stats::Stats;

/// Default number of removals allowed in flight.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Performs the actual removal of one directory tree.
pub trait Remover: Send + Sync + 'static {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Removes directory trees from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        remove_tree(path)
    }
}

/// Remove `path` and everything below it. A missing path is not an error.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Result of removing one candidate.
#[derive(Debug)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub size_mb: u64,
    pub error: Option<CleanerError>,
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of a deletion phase.
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Per-candidate outcomes in completion order.
    pub outcomes: Vec<DeletionOutcome>,
    pub removed: usize,
    pub failed: usize,
    /// Sum of `size_mb` over confirmed removals only.
    pub freed_mb: u64,
}

/// Removes candidates with bounded concurrency.
pub struct Deleter<R: Remover = FsRemover> {
    remover: Arc<R>,
    concurrency: usize,
    stats: Arc<Stats>,
    dry_run: bool,
}

impl Deleter<FsRemover> {
    pub fn new(concurrency: usize) -> Self {
        Self::with_remover(FsRemover, concurrency)
    }
}

impl<R: Remover> Deleter<R> {
    pub fn with_remover(remover: R, concurrency: usize) -> Self {
        Self {
            remover: Arc::new(remover),
            concurrency: concurrency.max(1),
            stats: Arc::new(Stats::new()),
            dry_run: false,
        }
    }

    /// Report what would be removed without touching the filesystem.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Share counters with an observer such as a progress display.
    pub fn with_stats(mut self, stats: Arc<Stats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Remove every candidate and wait for all removals to return.
    pub async fn delete(&self, chosen: Vec<Candidate>, reporter: Arc<dyn Reporter>) -> DeletionReport {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        // Lets a task that died without an outcome still be reported by path
        let mut in_flight: HashMap<Id, (PathBuf, u64)> = HashMap::new();

        for candidate in chosen {
            let key = (candidate.path.clone(), candidate.size_mb);

            if self.dry_run {
                reporter.report(Event::WouldRemove {
                    path: candidate.path.clone(),
                    size_mb: candidate.size_mb,
                });
                let handle = tasks.spawn(async move {
                    DeletionOutcome {
                        path: candidate.path,
                        size_mb: candidate.size_mb,
                        error: None,
                    }
                });
                in_flight.insert(handle.id(), key);
                continue;
            }

            // Blocks the dispatch loop while all permits are taken
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let remover = Arc::clone(&self.remover);
            let stats = Arc::clone(&self.stats);
            let reporter = Arc::clone(&reporter);

            let handle = tasks.spawn_blocking(move || {
                let _permit = permit;
                let Candidate { path, size_mb, .. } = candidate;

                match remover.remove(&path) {
                    Ok(()) => {
                        stats.record_removed(size_mb);
                        reporter.report(Event::Removed {
                            path: path.clone(),
                            freed_mb: size_mb,
                        });
                        DeletionOutcome {
                            path,
                            size_mb,
                            error: None,
                        }
                    }
                    Err(source) => {
                        stats.record_failed();
                        reporter.report(Event::RemoveFailed {
                            path: path.clone(),
                            reason: source.to_string(),
                        });
                        DeletionOutcome {
                            error: Some(CleanerError::Deletion {
                                path: path.clone(),
                                source,
                            }),
                            path,
                            size_mb,
                        }
                    }
                }
            });
            in_flight.insert(handle.id(), key);
        }

        let mut report = DeletionReport::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, outcome)) => {
                    in_flight.remove(&id);
                    outcome
                }
                Err(e) => {
                    // The removal panicked or was cancelled; its permit is already back
                    let (path, size_mb) = in_flight.remove(&e.id()).unwrap_or_default();
                    if !self.dry_run {
                        self.stats.record_failed();
                    }
                    reporter.report(Event::RemoveFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    DeletionOutcome {
                        error: Some(CleanerError::Deletion {
                            path: path.clone(),
                            source: io::Error::other(e.to_string()),
                        }),
                        path,
                        size_mb,
                    }
                }
            };

            if outcome.is_success() {
                report.removed += 1;
                report.freed_mb += outcome.size_mb;
            } else {
                report.failed += 1;
            }
            report.outcomes.push(outcome);
        }

        reporter.report(Event::Finished {
            removed: report.removed,
            failed: report.failed,
            freed_mb: report.freed_mb,
            dry_run: self.dry_run,
        });

        report
    }
}
