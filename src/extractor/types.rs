use crate::scanner::ScanFailure;
use crate::types::Weapon;

/// Result of extracting weapons from a blueprint tree
#[derive(Debug, Clone, Default)]
pub struct WeaponExtraction {
    /// Accepted weapons, merged with names, text and sources, sorted by blueprint name
    pub weapons: Vec<Weapon>,
    /// Weapon files that could not be decoded
    pub failures: Vec<ScanFailure>,
}
