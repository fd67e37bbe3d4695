//! Outcome of writing one package's generated files.

use std::path::PathBuf;

use serde::Serialize;

/// A file that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-file outcome counts and paths. Paths are absolute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Contracts, rewritten every run.
    pub written: Vec<PathBuf>,
    /// Stubs that did not exist before this run.
    pub created: Vec<PathBuf>,
    /// Stubs left untouched because they already exist.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<GenerationFailure>,
}

impl GenerationReport {
    /// Number of files written or created.
    pub fn success_count(&self) -> usize {
        self.written.len() + self.created.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns true if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: GenerationReport) {
        self.written.extend(other.written);
        self.created.extend(other.created);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}
