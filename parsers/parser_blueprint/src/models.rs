use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reference::strip_bp_prefix;

/// One decoded blueprint record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Blueprint {
    #[serde(rename = "AssetId")]
    pub asset_id: String,
    #[serde(rename = "Data")]
    pub data: BlueprintData,
}

/// Only the identifier of a blueprint, for indexing files of any kind
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlueprintHeader {
    #[serde(rename = "AssetId")]
    pub asset_id: String,
}

/// Record payload, selected by the `$type` discriminator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "$type")]
pub enum BlueprintData {
    #[serde(rename = "c00f723cccf2d314198c42a572c631fd, BlueprintItemWeapon")]
    ItemWeapon(Box<BlueprintItemWeapon>),
    #[serde(rename = "fa4fa7e4548127a47a2846c91b051065, BlueprintUnit")]
    Unit(BlueprintUnit),
    #[serde(rename = "0449d0493fd70da4ba79ef76be174b92, BlueprintLoot")]
    Loot(BlueprintLoot),
    #[serde(rename = "ccc43623dd9341449b5d07be1dabaa23, BlueprintSharedVendorTable")]
    SharedVendorTable(BlueprintSharedVendorTable),
    #[serde(other)]
    Unknown,
}

impl BlueprintData {
    pub fn kind(&self) -> &'static str {
        match self {
            BlueprintData::ItemWeapon(_) => "BlueprintItemWeapon",
            BlueprintData::Unit(_) => "BlueprintUnit",
            BlueprintData::Loot(_) => "BlueprintLoot",
            BlueprintData::SharedVendorTable(_) => "BlueprintSharedVendorTable",
            BlueprintData::Unknown => "Unknown",
        }
    }
}

/// A weapon record. Every field may be missing; absent stats stay absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlueprintItemWeapon {
    #[serde(rename = "CanBeUsedInGame", default)]
    pub can_be_used_in_game: bool,
    #[serde(rename = "m_IsNatural", default)]
    pub is_natural: bool,
    #[serde(rename = "IsUnlootable", default)]
    pub is_unlootable: bool,
    #[serde(rename = "IsNonRemovable", default)]
    pub is_non_removable: bool,

    #[serde(rename = "m_DisplayName", default)]
    pub display_name: LocalizedString,
    #[serde(rename = "m_Description", default)]
    pub description: LocalizedString,

    #[serde(rename = "AbilityContainer", default)]
    pub ability_container: AbilityContainer,

    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Family", default)]
    pub family: Option<String>,
    #[serde(rename = "Classification", default)]
    pub classification: Option<String>,
    #[serde(rename = "m_Heaviness", default)]
    pub heaviness: Option<String>,
    #[serde(rename = "m_HoldingType", default)]
    pub holding_type: Option<String>,

    #[serde(rename = "WarhammerDamage", default)]
    pub damage: Option<i32>,
    #[serde(rename = "WarhammerMaxDamage", default)]
    pub max_damage: Option<i32>,
    #[serde(rename = "WarhammerPenetration", default)]
    pub penetration: Option<i32>,
    #[serde(rename = "DodgePenetration", default)]
    pub dodge_penetration: Option<i32>,
    #[serde(rename = "AdditionalHitChance", default)]
    pub additional_hit_chance: Option<i32>,
    #[serde(rename = "WarhammerRecoil", default)]
    pub recoil: Option<i32>,
    #[serde(rename = "WarhammerMaxDistance", default)]
    pub max_distance: Option<i32>,
    #[serde(rename = "WarhammerMaxAmmo", default)]
    pub max_ammo: Option<i32>,
    #[serde(rename = "RateOfFire", default)]
    pub rate_of_fire: Option<i32>,

    #[serde(rename = "Components", default)]
    pub components: Vec<BlueprintComponent>,
}

impl BlueprintItemWeapon {
    /// Whether the weapon can end up in a player's inventory at all.
    /// A record without `CanBeUsedInGame` cannot.
    pub fn is_obtainable(&self) -> bool {
        self.can_be_used_in_game && !self.is_natural && !self.is_unlootable && !self.is_non_removable
    }

    pub fn is_heavy(&self) -> bool {
        self.heaviness.as_deref() == Some("Heavy")
    }

    pub fn is_two_handed(&self) -> bool {
        self.holding_type.as_deref() == Some("TwoHanded")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AbilityContainer {
    #[serde(rename = "Ability1", default)]
    pub ability1: Option<RawAbility>,
    #[serde(rename = "Ability2", default)]
    pub ability2: Option<RawAbility>,
    #[serde(rename = "Ability3", default)]
    pub ability3: Option<RawAbility>,
    #[serde(rename = "Ability4", default)]
    pub ability4: Option<RawAbility>,
    #[serde(rename = "Ability5", default)]
    pub ability5: Option<RawAbility>,
}

impl AbilityContainer {
    pub fn slots(&self) -> [Option<&RawAbility>; 5] {
        [
            self.ability1.as_ref(),
            self.ability2.as_ref(),
            self.ability3.as_ref(),
            self.ability4.as_ref(),
            self.ability5.as_ref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAbility {
    #[serde(rename = "Type")]
    pub ability_type: String,
    #[serde(rename = "m_Ability", default)]
    pub ability: Option<String>,
    #[serde(rename = "m_FXSettings", default)]
    pub fx_settings: Option<String>,
    #[serde(rename = "m_OnHitActions", default)]
    pub on_hit_actions: Option<String>,
    #[serde(rename = "OnHitOverrideType", default)]
    pub on_hit_override_type: Option<String>,
    #[serde(rename = "AP")]
    pub ap: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocalizedString {
    #[serde(rename = "m_Key", default)]
    pub key: String,
    #[serde(rename = "Shared", default)]
    pub shared: Option<SharedString>,
}

impl LocalizedString {
    pub fn shared_key(&self) -> &str {
        self.shared.as_ref().map(|s| s.key.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SharedString {
    #[serde(rename = "stringkey")]
    pub key: String,
}

/// Blueprint component, selected by the `$type` discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum BlueprintComponent {
    #[serde(rename = "6dfdda28c94860241a112b404538e2a7, EquipmentRestrictionStat")]
    EquipmentRestrictionStat(EquipmentRestrictionStat),
    #[serde(rename = "d7b23547716f4a949471625ff6c66fb2, EquipmentRestrictionHasFacts")]
    EquipmentRestrictionHasFacts(EquipmentRestrictionHasFacts),
    #[serde(rename = "65221a9a6133bd0408b019b86642d97e, AddFactToEquipmentWielder")]
    AddFactToEquipmentWielder(AddFactToEquipmentWielder),
    #[serde(rename = "9a9cba603f85c634690eb67962fdf792, LootItemsPackFixed")]
    LootItemsPackFixed(LootItemsPackFixed),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRestrictionStat {
    #[serde(rename = "Stat")]
    pub stat: String,
    #[serde(rename = "MinValue")]
    pub min_value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRestrictionHasFacts {
    #[serde(rename = "All")]
    pub all: bool,
    #[serde(rename = "m_Inverted")]
    pub inverted: bool,
    #[serde(rename = "m_Facts")]
    pub facts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFactToEquipmentWielder {
    pub name: String,
    #[serde(rename = "m_Flags")]
    pub flags: i32,
    #[serde(rename = "PrototypeLink")]
    pub prototype_link: PrototypeLink,
    #[serde(rename = "m_Overrides")]
    pub overrides: Vec<String>,
    #[serde(rename = "m_Fact")]
    pub fact: String,
}

impl AddFactToEquipmentWielder {
    /// A fresh component granting `fact_guid`, in the shape patches prepend
    pub fn new(name: impl Into<String>, fact_guid: &str) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            prototype_link: PrototypeLink::default(),
            overrides: Vec::new(),
            fact: format!("{}{}", crate::reference::BP_PREFIX, strip_bp_prefix(fact_guid)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrototypeLink {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItemsPackFixed {
    #[serde(rename = "m_Item")]
    pub item: PackedItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedItem {
    #[serde(rename = "m_Item")]
    pub item: String,
    #[serde(rename = "m_ProfitFactorCost", default)]
    pub profit_factor_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlueprintUnit {
    #[serde(rename = "Body")]
    pub body: UnitBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitBody {
    #[serde(rename = "ItemEquipmentHandSettings", default)]
    pub hand_settings: Option<HandSettings>,
    #[serde(flatten)]
    pub slots: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HandSettings {
    #[serde(rename = "m_PrimaryHand", default)]
    pub primary_hand: Option<String>,
    #[serde(rename = "m_SecondaryHand", default)]
    pub secondary_hand: Option<String>,
    #[serde(rename = "m_PrimaryHandAlternative1", default)]
    pub primary_hand_alt: Option<String>,
    #[serde(rename = "m_SecondaryHandAlternative1", default)]
    pub secondary_hand_alt: Option<String>,
}

impl BlueprintUnit {
    /// Every item reference the unit carries: plain string body slots plus the hand settings.
    /// A body without hand settings carries no equipment.
    pub fn item_refs(&self) -> Vec<&str> {
        let Some(hands) = &self.body.hand_settings else {
            return Vec::new();
        };

        let mut refs: Vec<&str> = self
            .body
            .slots
            .values()
            .filter_map(Value::as_str)
            .collect();

        refs.extend(
            [
                &hands.primary_hand,
                &hands.secondary_hand,
                &hands.primary_hand_alt,
                &hands.secondary_hand_alt,
            ]
            .into_iter()
            .filter_map(|slot| slot.as_deref()),
        );

        refs
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlueprintLoot {
    #[serde(rename = "Items")]
    pub items: Vec<LootItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LootItem {
    #[serde(rename = "m_Item")]
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlueprintSharedVendorTable {
    #[serde(rename = "Components")]
    pub components: Vec<BlueprintComponent>,
}

impl BlueprintSharedVendorTable {
    /// Fixed item packs offered by the vendor
    pub fn packs(&self) -> impl Iterator<Item = &PackedItem> {
        self.components.iter().filter_map(|component| match component {
            BlueprintComponent::LootItemsPackFixed(pack) => Some(&pack.item),
            _ => None,
        })
    }
}
