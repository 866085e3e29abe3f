//! Cleaner module - discovery and removal of disposable dependency directories
//!
//! Finds marker directories (`node_modules` by default) that sit next to a
//! manifest (`package.json`), ranks them by how many dependencies they hold,
//! and removes the chosen ones with bounded concurrency.

pub mod candidate;
pub mod config;
pub mod deleter;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod select;
pub mod size;
pub mod stats;

pub use candidate::{rank, Candidate};
pub use config::Config;
pub use deleter::{Deleter, DeletionOutcome, DeletionReport, FsRemover, Remover};
pub use error::CleanerError;
pub use manifest::{Manifest, ManifestReader};
pub use pipeline::{Pipeline, RunSummary};
pub use report::{ConsoleReporter, Event, NullReporter, Reporter};
pub use scanner::{ScanResult, Scanner};
pub use select::{DefaultSelection, FixedSelection, SelectAll, Selector};
pub use size::{bytes_to_mb, dir_size, DirSize};
pub use stats::Stats;
