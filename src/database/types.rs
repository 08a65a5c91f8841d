use std::collections::HashMap;

use crate::scanner::ScanFailure;

/// Cross-reference indices built from the blueprint tree.
///
/// Populated once by [`BlueprintDatabase::build`](super::BlueprintDatabase::build)
/// and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BlueprintDatabase {
    /// Blueprint GUID to file stem
    pub(crate) guid_to_name: HashMap<String, String>,
    /// File stem to blueprint GUID
    pub(crate) name_to_guid: HashMap<String, String>,
    /// Item GUID to human-readable places it can be obtained
    pub(crate) sources: HashMap<String, Vec<String>>,
    /// Localization key to display text
    pub(crate) strings: HashMap<String, String>,
    /// Files that failed while building the indices
    pub(crate) failures: Vec<ScanFailure>,
}

/// Statistics about the database contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of name-resolvable blueprints
    pub blueprints: usize,
    /// Number of items with at least one source
    pub sourced_items: usize,
    /// Number of localized strings
    pub strings: usize,
    /// Number of files that could not be indexed
    pub failed: usize,
}
