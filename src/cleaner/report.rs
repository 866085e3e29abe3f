//! Reporting events emitted by the pipeline.
//!
//! Library code never prints. Each stage hands an [`Event`] to a [`Reporter`],
//! and the binary decides how to render it.

use colored::Colorize;
use std::path::PathBuf;

use super::error::CleanerError;

/// Something worth telling the operator about.
#[derive(Debug)]
pub enum Event {
    /// A manifest-backed marker directory was found.
    Discovered {
        path: PathBuf,
        dependencies: usize,
        dev_dependencies: usize,
    },
    /// A marker directory was excluded because of its manifest.
    Skipped { path: PathBuf, error: CleanerError },
    /// A branch of the tree could not be walked.
    WalkError { error: CleanerError },
    /// A candidate was measured. `error` means the size may be an undercount.
    Sized {
        path: PathBuf,
        size_mb: u64,
        error: Option<CleanerError>,
    },
    /// Discovery and sizing are complete.
    Summary { candidates: usize, total_mb: u64 },
    /// The operator chose nothing.
    NothingSelected,
    /// A candidate directory was removed.
    Removed { path: PathBuf, freed_mb: u64 },
    /// A dry run would have removed this candidate.
    WouldRemove { path: PathBuf, size_mb: u64 },
    /// A candidate directory could not be removed.
    RemoveFailed { path: PathBuf, reason: String },
    /// Every removal has returned. In a dry run nothing was touched and
    /// `freed_mb` is what would have been freed.
    Finished {
        removed: usize,
        failed: usize,
        freed_mb: u64,
        dry_run: bool,
    },
}

/// Receives pipeline events. Implementations must tolerate calls from
/// several threads at once.
pub trait Reporter: Send + Sync {
    fn report(&self, event: Event);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: Event) {}
}

/// Colored console output.
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    /// Also print per-candidate discovery and sizing lines.
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Render an event as a single line, or nothing.
    pub fn render(&self, event: &Event) -> Option<String> {
        match event {
            Event::Discovered {
                path,
                dependencies,
                dev_dependencies,
            } if self.verbose => Some(
                format!(
                    "Found {} ({} dependencies)",
                    path.display(),
                    dependencies + dev_dependencies
                )
                .cyan()
                .to_string(),
            ),
            Event::Discovered { .. } => None,
            Event::Skipped { error, .. } => Some(error.to_string().yellow().to_string()),
            Event::WalkError { error } => Some(error.to_string().red().to_string()),
            Event::Sized {
                path,
                error: Some(error),
                ..
            } => Some(
                format!("Error getting size for {}: {}", path.display(), error)
                    .red()
                    .to_string(),
            ),
            Event::Sized { path, size_mb, .. } if self.verbose => {
                Some(format!("{}: {}MB", path.display(), size_mb))
            }
            Event::Sized { .. } => None,
            Event::Summary { candidates: 0, .. } => {
                Some("No candidate directories found.".green().to_string())
            }
            Event::Summary {
                candidates,
                total_mb,
            } => Some(
                format!(
                    "\nFound {} directories consuming a total of {}MB ({})\n",
                    candidates,
                    total_mb,
                    humansize::format_size(total_mb * 1024 * 1024, humansize::BINARY)
                )
                .cyan()
                .to_string(),
            ),
            Event::NothingSelected => Some(
                "No directories selected for removal. Exiting."
                    .yellow()
                    .to_string(),
            ),
            Event::Removed { path, freed_mb } => Some(
                format!("Successfully removed {}, freed {}MB", path.display(), freed_mb)
                    .green()
                    .to_string(),
            ),
            Event::WouldRemove { path, size_mb } => Some(
                format!("Would remove {} ({}MB)", path.display(), size_mb)
                    .yellow()
                    .to_string(),
            ),
            Event::RemoveFailed { path, reason } => Some(
                format!("Error removing {}: {}", path.display(), reason)
                    .red()
                    .to_string(),
            ),
            Event::Finished {
                removed,
                freed_mb,
                dry_run: true,
                ..
            } => Some(
                format!(
                    "\nDry run: {}MB would be freed ({} would be removed, nothing deleted)",
                    freed_mb, removed
                )
                .yellow()
                .to_string(),
            ),
            Event::Finished {
                removed,
                failed,
                freed_mb,
                dry_run: false,
            } => {
                let mut line = format!("\nTotal space freed: {}MB ({} removed", freed_mb, removed);
                if *failed > 0 {
                    line.push_str(&format!(", {} failed", failed));
                }
                line.push(')');
                Some(line.green().to_string())
            }
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: Event) {
        let is_problem = matches!(
            event,
            Event::Skipped { .. }
                | Event::WalkError { .. }
                | Event::RemoveFailed { .. }
                | Event::Sized { error: Some(_), .. }
        );
        if let Some(line) = self.render(&event) {
            if is_problem {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
}
