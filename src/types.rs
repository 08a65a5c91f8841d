use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use parser_blueprint::{DEFAULT_LOCALE, NONE_TEXT};
use serde::{Deserialize, Serialize};

/// Number of ability slots a weapon carries
pub const ABILITY_SLOTS: usize = 5;

/// Declares a game enum whose `Unset` member is spelled `None` in every text format
macro_rules! game_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = "None")]
            Unset,
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::Unset => NONE_TEXT,
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    NONE_TEXT => Ok($name::Unset),
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err(anyhow!("Unknown {} value: {}", stringify!($name), other)),
                }
            }
        }
    };
}

game_enum!(
    /// Weapon category as the game stores it in `Category`
    WeaponCategory {
        Melee,
        Pistol,
        Basic,
        Heavy,
        Thrown,
        Exotic,
    }
);

game_enum!(
    /// Weapon family as the game stores it in `Family`
    WeaponFamily {
        Laser,
        Solid,
        Bolt,
        Melta,
        Plasma,
        Flame,
        Exotic,
        Primitive,
        Chain,
        Power,
        Force,
    }
);

game_enum!(
    /// Weapon classification as the game stores it in `Classification`
    WeaponClassification {
        Knife,
        Sword,
        Axe,
        MaulOrHammer,
        Chainsaw,
        Staff,
        Claw,
        Fist,
        Glaive,
        Shotgun,
        Pistol,
        Rifle,
        SniperRifle,
        Launcher,
        Cannon,
        Grenade,
    }
);

game_enum!(
    /// Attack kind of one ability slot
    AbilityType {
        SingleShot,
        Burst,
        Scatter,
        Pattern,
        Cone,
        Melee,
        MeleeAlternate,
        MeleeBurst,
        Special,
        Reload,
    }
);

game_enum!(
    /// How an ability's on-hit actions combine with the base attack
    OnHitOverrideType {
        Add,
        Replace,
    }
);

/// Parse a raw enum string where the `None` sentinel means the field is absent
pub fn parse_optional<T>(raw: &str) -> Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    if raw == NONE_TEXT {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

/// One ability slot of a weapon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponAbility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_type: Option<AbilityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_bp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_bp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_bp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_bp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hit_actions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hit_action_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ap: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hit_override_type: Option<OnHitOverrideType>,
}

impl WeaponAbility {
    /// The all-absent sentinel, equivalent to no ability
    pub fn is_empty(&self) -> bool {
        *self == WeaponAbility::default()
    }

    /// An explicit `Type: None` clearing the slot
    pub fn is_cleared(&self) -> bool {
        self.ability_type == Some(AbilityType::Unset)
    }
}

/// Minimum stat needed to equip a weapon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRestriction {
    pub stat: String,
    pub requirement: i32,
}

/// Facts the wielder must (or must not) have
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRequirement {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub negate: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fact_names: Vec<String>,
}

/// A weapon blueprint, assembled and cross-referenced.
///
/// Every stat is presence-tracked: `None` means "not specified / inherit from
/// baseline", while `Some(Unset)`, `Some(false)` or `Some(0)` are explicit values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub blueprint_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_shared_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description_shared_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<WeaponCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<WeaponFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<WeaponClassification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heavy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_handed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penetration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dodge_reduction: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_hit_chance: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recoil: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_range: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_of_fire: Option<i32>,

    #[serde(default, skip_serializing_if = "no_abilities")]
    pub abilities: [Option<WeaponAbility>; ABILITY_SLOTS],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_restriction: Option<StatRestriction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fact_requirements: Vec<FactRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_facts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_fact_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

fn no_abilities(abilities: &[Option<WeaponAbility>; ABILITY_SLOTS]) -> bool {
    abilities.iter().all(Option::is_none)
}

impl Weapon {
    /// Populated ability slots, skipping the all-absent sentinel
    pub fn abilities(&self) -> impl Iterator<Item = &WeaponAbility> {
        self.abilities
            .iter()
            .flatten()
            .filter(|ability| !ability.is_empty())
    }

    /// Whether any slot references the given ability blueprint
    pub fn has_ability_bp(&self, guid: &str) -> bool {
        self.abilities()
            .any(|ability| ability.ability_bp.as_deref() == Some(guid))
    }

    /// Whether any non-negated fact requirement lists `guid`
    pub fn requires_fact(&self, guid: &str) -> bool {
        self.fact_requirements
            .iter()
            .any(|req| !req.negate && req.facts.iter().any(|fact| fact == guid))
    }

    /// Whether any field a patch could carry is present
    pub fn has_patchable_fields(&self) -> bool {
        self.category.is_some()
            || self.family.is_some()
            || self.classification.is_some()
            || self.heavy.is_some()
            || self.two_handed.is_some()
            || self.min_damage.is_some()
            || self.max_damage.is_some()
            || self.penetration.is_some()
            || self.dodge_reduction.is_some()
            || self.additional_hit_chance.is_some()
            || self.recoil.is_some()
            || self.max_range.is_some()
            || self.ammo.is_some()
            || self.rate_of_fire.is_some()
            || self.abilities.iter().any(Option::is_some)
            || !self.extra_facts.is_empty()
            || !self.extra_fact_names.is_empty()
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blueprint_name.is_empty() {
            write!(f, "<unnamed {}>", self.guid)
        } else {
            write!(f, "{} ({})", self.blueprint_name, self.guid)
        }
    }
}

/// Configuration for index building and weapon extraction
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Root of the modification template (contains `Blueprints/` and `Strings/`)
    pub template_root: PathBuf,
    /// Root of the mod being built
    pub mod_path: PathBuf,
    /// Worker threads for the merge phase
    pub max_threads: usize,
    /// Locale used to resolve display text
    pub locale: String,
    /// Extension of blueprint record files
    pub blueprint_extension: String,
    /// Extension of localized string bundles
    pub strings_extension: String,
    /// Subtree of `Blueprints/` holding weapon records
    pub weapons_subpath: String,
    /// Subtrees of `Blueprints/` whose records are name-resolvable
    pub name_subpaths: Vec<String>,
    /// Subtrees of `Blueprints/` holding loot chests
    pub loot_subpaths: Vec<String>,
    /// Subtrees of `Blueprints/` holding units with equipment
    pub unit_subpaths: Vec<String>,
    /// Subtrees of `Blueprints/` holding vendor tables
    pub vendor_subpaths: Vec<String>,
    /// Subtrees of the template root holding string bundles
    pub strings_subpaths: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("../../../"),
            mod_path: PathBuf::from("./"),
            max_threads: num_cpus::get(),
            locale: DEFAULT_LOCALE.to_string(),
            blueprint_extension: "jbp".to_string(),
            strings_extension: "json".to_string(),
            weapons_subpath: "Weapons".to_string(),
            name_subpaths: [
                "Weapons",
                "Classes",
                "Backgrounds",
                "Units/Companions",
                "Equipment/CommonFeatures",
                "SoulMarks",
                "Buffs",
                "FX/AbilityFxSettings",
            ]
            .map(String::from)
            .to_vec(),
            loot_subpaths: vec!["Loot".to_string()],
            unit_subpaths: ["Units/NPC", "Units/Monsters", "Units/Companions"]
                .map(String::from)
                .to_vec(),
            vendor_subpaths: vec!["Loot/VendorTables".to_string()],
            strings_subpaths: vec!["Strings/Mechanics/Blueprints/Weapons".to_string()],
        }
    }
}

impl ScannerConfig {
    pub fn blueprints_root(&self) -> PathBuf {
        self.template_root.join("Blueprints")
    }

    pub fn weapons_dir(&self) -> PathBuf {
        self.blueprints_root().join(&self.weapons_subpath)
    }

    pub fn mod_blueprints_dir(&self) -> PathBuf {
        self.mod_path.join("Blueprints")
    }
}
