use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;

/// A file the scanner could not process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    /// File (or directory) that failed
    pub path: PathBuf,
    /// Cause, as reported by the visitor or the runtime
    pub reason: String,
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Everything a scan produced
#[derive(Debug)]
pub struct ScanOutput<T> {
    /// Values produced by the visitor, in no particular order
    pub results: Vec<T>,
    /// Files that failed, in no particular order
    pub failures: Vec<ScanFailure>,
}

impl<T> Default for ScanOutput<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Shared accumulator the scan tasks append into
pub(crate) struct ScanCollector<T> {
    results: Mutex<Vec<T>>,
    failures: Mutex<Vec<ScanFailure>>,
}

impl<T> ScanCollector<T> {
    pub(crate) fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn extend(&self, values: Vec<T>) {
        if values.is_empty() {
            return;
        }
        // A poisoned lock only means another visitor panicked; the data is still valid
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.extend(values);
    }

    pub(crate) fn fail(&self, path: &Path, reason: impl Into<String>) {
        let failure = ScanFailure {
            path: path.to_path_buf(),
            reason: reason.into(),
        };
        warn!("Failed to process {}", failure);
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.push(failure);
    }

    /// Drain everything collected so far
    pub(crate) fn take(&self) -> ScanOutput<T> {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        ScanOutput {
            results: mem::take(&mut *results),
            failures: mem::take(&mut *failures),
        }
    }
}
