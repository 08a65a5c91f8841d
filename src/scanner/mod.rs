
mod collector;
mod scanner;

pub use collector::{ScanFailure, ScanOutput};
pub use scanner::scan;

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Scanner bound to one directory tree and file extension
pub struct TreeScanner {
    /// Root of the tree to walk
    root: PathBuf,
    /// Extension (without the dot) of files to visit
    extension: String,
}

impl TreeScanner {
    /// Create a new tree scanner
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Visit every matching file, collecting zero or more values per file
    pub async fn scan<T, I, F>(&self, visit: F) -> Result<ScanOutput<T>>
    where
        T: Send + 'static,
        I: IntoIterator<Item = T>,
        F: Fn(&Path) -> Result<I> + Send + Sync + 'static,
    {
        scanner::scan(&self.root, &self.extension, visit).await
    }
}
