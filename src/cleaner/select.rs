//! Candidate selection.
//!
//! The pipeline only needs `select(candidates, default_selected) -> paths`.
//! The interactive checklist lives in `crate::ui`; the selectors here are
//! non-interactive.

use std::collections::HashSet;
use std::path::PathBuf;

use super::candidate::Candidate;
use super::error::CleanerError;

/// Chooses which ranked candidates to remove.
pub trait Selector {
    /// Return the chosen paths. `default_selected` is the initial state of
    /// every candidate; inverted selection passes `false`.
    fn select(
        &mut self,
        candidates: &[Candidate],
        default_selected: bool,
    ) -> Result<Vec<PathBuf>, CleanerError>;
}

/// Accepts the default state without asking: everything, or nothing when
/// selection is inverted.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSelection;

impl Selector for DefaultSelection {
    fn select(
        &mut self,
        candidates: &[Candidate],
        default_selected: bool,
    ) -> Result<Vec<PathBuf>, CleanerError> {
        if !default_selected {
            return Ok(Vec::new());
        }
        Ok(candidates.iter().map(|c| c.path.clone()).collect())
    }
}

/// Selects every candidate regardless of the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectAll;

impl Selector for SelectAll {
    fn select(&mut self, candidates: &[Candidate], _: bool) -> Result<Vec<PathBuf>, CleanerError> {
        Ok(candidates.iter().map(|c| c.path.clone()).collect())
    }
}

/// Selects a fixed list of paths, ignoring any that were not discovered.
#[derive(Debug, Default, Clone)]
pub struct FixedSelection {
    paths: Vec<PathBuf>,
}

impl FixedSelection {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Selector for FixedSelection {
    fn select(&mut self, candidates: &[Candidate], _: bool) -> Result<Vec<PathBuf>, CleanerError> {
        let known: HashSet<_> = candidates.iter().map(|c| &c.path).collect();
        Ok(self
            .paths
            .iter()
            .filter(|p| known.contains(p))
            .cloned()
            .collect())
    }
}

/// Resolve chosen paths back to candidates, keeping ranked order and
/// dropping duplicates and unknown paths.
pub fn resolve_chosen(candidates: Vec<Candidate>, chosen: &[PathBuf]) -> Vec<Candidate> {
    let wanted: HashSet<_> = chosen.iter().collect();
    candidates
        .into_iter()
        .filter(|c| wanted.contains(&c.path))
        .collect()
}
