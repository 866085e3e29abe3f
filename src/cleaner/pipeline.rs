//! End-to-end run: resolve the root, discover, measure, rank, select, delete.

use rayon::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::candidate::{self, Candidate};
use super::config::Config;
use super::deleter::{Deleter, DeletionReport};
use super::error::CleanerError;
use super::report::{Event, Reporter};
use super::scanner::Scanner;
use super::select::{resolve_chosen, Selector};
use super::size::dir_size;

/// What a run found and reclaimed.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub found: usize,
    pub total_mb: u64,
    pub selected: usize,
    pub deletion: DeletionReport,
}

/// Drives the discovery and deletion phases. The two phases never overlap.
pub struct Pipeline {
    config: Arc<Config>,
    reporter: Arc<dyn Reporter>,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config,
            reporter,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the starting directory: `path` if given, otherwise the
    /// current working directory. Failure here aborts the run.
    pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf, CleanerError> {
        let start = match path {
            Some(p) => p.to_path_buf(),
            None => env::current_dir().map_err(|e| CleanerError::RootResolution {
                path: None,
                source: e,
            })?,
        };

        start.canonicalize().map_err(|e| CleanerError::RootResolution {
            path: Some(start.clone()),
            source: e,
        })
    }

    /// Discovery phase: scan, measure and rank.
    pub fn discover(&self, root: &Path) -> Result<Vec<Candidate>, CleanerError> {
        let scanner = Scanner::new(root.to_path_buf(), Arc::clone(&self.config))?;
        let result = scanner.scan(self.reporter.as_ref());

        for error in result.walk_errors {
            self.reporter.report(Event::WalkError { error });
        }

        let mut candidates = result.candidates;
        measure(&mut candidates, self.reporter.as_ref());
        candidate::rank(&mut candidates);

        self.reporter.report(Event::Summary {
            candidates: candidates.len(),
            total_mb: candidate::total_size_mb(&candidates),
        });

        Ok(candidates)
    }

    /// Deletion phase for an already chosen subset.
    pub async fn delete(&self, chosen: Vec<Candidate>) -> DeletionReport {
        Deleter::new(self.config.delete_concurrency)
            .with_dry_run(self.dry_run)
            .delete(chosen, Arc::clone(&self.reporter))
            .await
    }

    /// Full run against `root` with `selector` choosing what to remove.
    pub async fn run(
        &self,
        root: &Path,
        selector: &mut dyn Selector,
    ) -> Result<RunSummary, CleanerError> {
        let candidates = self.discover(root)?;
        let mut summary = RunSummary {
            found: candidates.len(),
            total_mb: candidate::total_size_mb(&candidates),
            ..RunSummary::default()
        };

        if candidates.is_empty() {
            return Ok(summary);
        }

        let chosen = selector.select(&candidates, !self.config.invert_selection)?;
        let chosen = resolve_chosen(candidates, &chosen);
        summary.selected = chosen.len();

        if chosen.is_empty() {
            self.reporter.report(Event::NothingSelected);
            return Ok(summary);
        }

        summary.deletion = self.delete(chosen).await;
        Ok(summary)
    }
}

/// Second pass: attach sizes to every candidate, measuring them in parallel.
///
/// A sizing error keeps the partial value and flags the candidate.
pub fn measure(candidates: &mut [Candidate], reporter: &dyn Reporter) {
    candidates.par_iter_mut().for_each(|candidate| {
        let size = dir_size(&candidate.path);
        candidate.size_mb = size.megabytes();
        candidate.size_error = size.is_partial();
        reporter.report(Event::Sized {
            path: candidate.path.clone(),
            size_mb: candidate.size_mb,
            error: size.error,
        });
    });
}
