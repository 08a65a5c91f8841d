pub mod analyzer;
pub mod commands;
pub mod database;
pub mod extractor;
pub mod formats;
pub mod patcher;
pub mod reducer;
pub mod scanner;
pub mod types;
pub mod utils;

pub use types::{
    ABILITY_SLOTS,
    AbilityType,
    FactRequirement,
    OnHitOverrideType,
    ScannerConfig,
    StatRestriction,
    Weapon,
    WeaponAbility,
    WeaponCategory,
    WeaponClassification,
    WeaponFamily,
};

pub use analyzer::{WeaponType, classify, group_by_type};
pub use database::BlueprintDatabase;
pub use extractor::{WeaponExtraction, WeaponExtractor};
pub use patcher::{PatchEntry, PatchWriter, WeaponPatch, diff, resolve_references};
pub use reducer::{ReduceSummary, reduce, reduce_directory};
pub use scanner::{ScanFailure, ScanOutput, TreeScanner};
