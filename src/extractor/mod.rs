pub mod types;
mod extractor;

pub use extractor::*;
pub use types::*;

use std::path::PathBuf;

use anyhow::Result;
use log::warn;

use crate::database::BlueprintDatabase;
use crate::types::ScannerConfig;

/// Extractor for weapon blueprints
pub struct WeaponExtractor {
    /// Directory holding weapon records
    weapons_dir: PathBuf,
    /// Extension of weapon record files
    extension: String,
    /// Number of threads for the merge phase
    threads: usize,
}

impl WeaponExtractor {
    /// Create a new weapon extractor
    pub fn new(weapons_dir: impl Into<PathBuf>, threads: usize) -> Self {
        Self {
            weapons_dir: weapons_dir.into(),
            extension: "jbp".to_string(),
            threads,
        }
    }

    /// Create a weapon extractor for the configured template
    pub fn with_config(config: &ScannerConfig) -> Self {
        Self {
            weapons_dir: config.weapons_dir(),
            extension: config.blueprint_extension.clone(),
            threads: config.max_threads,
        }
    }

    /// Extract every obtainable weapon, resolved against `db`
    pub async fn extract(&self, db: &BlueprintDatabase) -> Result<WeaponExtraction> {
        let extraction = extract_weapons(&self.weapons_dir, &self.extension, db, self.threads).await?;
        if !extraction.failures.is_empty() {
            warn!(
                "{} weapon files under {} failed to decode",
                extraction.failures.len(),
                self.weapons_dir.display()
            );
        }
        Ok(extraction)
    }
}
