use parser_blueprint::BlueprintComponent;
use serde::{Deserialize, Serialize};

use crate::types::{ABILITY_SLOTS, AbilityType, OnHitOverrideType, WeaponCategory, WeaponClassification, WeaponFamily};

/// Field-level delta for one weapon, serialized with the game's field names
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeaponPatch {
    #[serde(rename = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<WeaponCategory>,
    #[serde(rename = "Family", skip_serializing_if = "Option::is_none")]
    pub family: Option<WeaponFamily>,
    #[serde(rename = "Classification", skip_serializing_if = "Option::is_none")]
    pub classification: Option<WeaponClassification>,
    #[serde(rename = "m_Heaviness", skip_serializing_if = "Option::is_none")]
    pub heaviness: Option<String>,
    #[serde(rename = "m_HoldingType", skip_serializing_if = "Option::is_none")]
    pub holding_type: Option<String>,
    #[serde(rename = "IsTwoHanded", skip_serializing_if = "Option::is_none")]
    pub is_two_handed: Option<bool>,
    #[serde(rename = "WarhammerDamage", skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(rename = "WarhammerMaxDamage", skip_serializing_if = "Option::is_none")]
    pub max_damage: Option<i32>,
    #[serde(rename = "WarhammerPenetration", skip_serializing_if = "Option::is_none")]
    pub penetration: Option<i32>,
    #[serde(rename = "DodgePenetration", skip_serializing_if = "Option::is_none")]
    pub dodge_penetration: Option<i32>,
    #[serde(rename = "AdditionalHitChance", skip_serializing_if = "Option::is_none")]
    pub additional_hit_chance: Option<i32>,
    #[serde(rename = "WarhammerRecoil", skip_serializing_if = "Option::is_none")]
    pub recoil: Option<i32>,
    #[serde(rename = "WarhammerMaxDistance", skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<i32>,
    #[serde(rename = "WarhammerMaxAmmo", skip_serializing_if = "Option::is_none")]
    pub max_ammo: Option<i32>,
    #[serde(rename = "RateOfFire", skip_serializing_if = "Option::is_none")]
    pub rate_of_fire: Option<i32>,
    #[serde(rename = "AbilityContainer", skip_serializing_if = "Option::is_none")]
    pub ability_container: Option<AbilityContainerPatch>,
    #[serde(rename = "Components", skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentPatch>,
}

impl WeaponPatch {
    pub fn is_empty(&self) -> bool {
        *self == WeaponPatch::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AbilityContainerPatch {
    #[serde(rename = "Ability1", skip_serializing_if = "Option::is_none")]
    pub ability1: Option<AbilityPatch>,
    #[serde(rename = "Ability2", skip_serializing_if = "Option::is_none")]
    pub ability2: Option<AbilityPatch>,
    #[serde(rename = "Ability3", skip_serializing_if = "Option::is_none")]
    pub ability3: Option<AbilityPatch>,
    #[serde(rename = "Ability4", skip_serializing_if = "Option::is_none")]
    pub ability4: Option<AbilityPatch>,
    #[serde(rename = "Ability5", skip_serializing_if = "Option::is_none")]
    pub ability5: Option<AbilityPatch>,
}

impl AbilityContainerPatch {
    /// Build a container from per-slot patches; `None` when no slot changed
    pub fn from_slots(slots: [Option<AbilityPatch>; ABILITY_SLOTS]) -> Option<Self> {
        if slots.iter().all(Option::is_none) {
            return None;
        }
        let [ability1, ability2, ability3, ability4, ability5] = slots;
        Some(Self {
            ability1,
            ability2,
            ability3,
            ability4,
            ability5,
        })
    }
}

/// Changed sub-fields of one ability slot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AbilityPatch {
    #[serde(rename = "AP", skip_serializing_if = "Option::is_none")]
    pub ap: Option<i32>,
    #[serde(rename = "m_Ability", skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub ability_type: Option<AbilityType>,
    /// `Some(None)` writes an explicit `null`
    #[serde(rename = "m_FXSettings", skip_serializing_if = "Option::is_none")]
    pub fx_settings: Option<Option<String>>,
    /// `Some(None)` writes an explicit `null`
    #[serde(rename = "m_OnHitActions", skip_serializing_if = "Option::is_none")]
    pub on_hit_actions: Option<Option<String>>,
    #[serde(rename = "OnHitOverrideType", skip_serializing_if = "Option::is_none")]
    pub on_hit_override_type: Option<OnHitOverrideType>,
}

impl AbilityPatch {
    pub fn is_empty(&self) -> bool {
        *self == AbilityPatch::default()
    }
}

/// A change to the weapon's component list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "PatchType")]
pub enum ComponentPatch {
    Prepend {
        #[serde(rename = "NewElement")]
        new_element: BlueprintComponent,
    },
}

/// One row of the generated patch manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    #[serde(rename = "Guid")]
    pub guid: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "PatchType")]
    pub patch_type: i32,
}

impl PatchEntry {
    /// Patch type the mod loader uses for blueprint JSON patches
    pub const BLUEPRINT_PATCH: i32 = 2;

    pub fn new(guid: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            filename: filename.into(),
            patch_type: Self::BLUEPRINT_PATCH,
        }
    }
}
