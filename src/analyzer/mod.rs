pub mod types;
mod classifier;

pub use classifier::classify;
pub use types::*;

use std::collections::BTreeMap;

use log::{debug, info};

use crate::types::Weapon;

/// Partition weapons by their grouping, keeping input order inside each group
pub fn group_by_type(weapons: &[Weapon]) -> BTreeMap<WeaponType, Vec<Weapon>> {
    let mut groups: BTreeMap<WeaponType, Vec<Weapon>> = BTreeMap::new();
    for weapon in weapons {
        let weapon_type = classify(weapon);
        debug!("{} classified as {}", weapon, weapon_type);
        groups.entry(weapon_type).or_default().push(weapon.clone());
    }

    info!("Classified {} weapons into {} groups", weapons.len(), groups.len());
    groups
}
