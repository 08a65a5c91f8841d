use serde::{Deserialize, Serialize};

/// Semantic weapon grouping used for reports and split baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponType {
    Other,
    Arc,
    Webber,
    Pistol,
    Flame,
    BlastGun,
    Bolter,
    Autogun,
    Lasgun,
    Rifle,
    Plasma,
    Melta,
    Shotgun,
    Sword,
    ForceSword,
    RockSaw,
    Hammer,
    Axe,
    PowerPick,
    Dagger,
    NavigatorStaff,
    PsykerStaff,
    Shuriken,
    Splinter,
    ChainSword,
    PowerSword,
}

impl std::fmt::Display for WeaponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
