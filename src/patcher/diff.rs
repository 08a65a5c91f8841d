use std::collections::HashSet;

use md5::{Digest, Md5};
use parser_blueprint::{AddFactToEquipmentWielder, BlueprintComponent};
use uuid::Uuid;

use super::types::{AbilityContainerPatch, AbilityPatch, ComponentPatch, WeaponPatch};
use crate::types::{OnHitOverrideType, Weapon, WeaponAbility};

const ADD_FACT_NAME_PREFIX: &str = "$AddFactToEquipmentWielder$";

/// The edited value, when it is present and differs from the baseline value (or its default)
fn changed<T: PartialEq + Default + Clone>(edited: &Option<T>, baseline: &Option<T>) -> Option<T> {
    let value = edited.as_ref()?;
    let base = baseline.clone().unwrap_or_default();
    (*value != base).then(|| value.clone())
}

/// Minimal patch turning `baseline` into `edited`; `None` when nothing changed
pub fn diff(edited: &Weapon, baseline: &Weapon) -> Option<WeaponPatch> {
    let two_handed = changed(&edited.two_handed, &baseline.two_handed);

    let mut slots: [Option<AbilityPatch>; 5] = Default::default();
    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(ability) = &edited.abilities[index] else {
            continue;
        };
        let base = baseline.abilities[index].clone().unwrap_or_default();
        if *ability != base {
            *slot = diff_ability(ability, &base);
        }
    }

    let patch = WeaponPatch {
        category: changed(&edited.category, &baseline.category),
        family: changed(&edited.family, &baseline.family),
        classification: changed(&edited.classification, &baseline.classification),
        heaviness: changed(&edited.heavy, &baseline.heavy)
            .map(|heavy| if heavy { "Heavy" } else { "NotHeavy" }.to_string()),
        holding_type: two_handed.map(|two| if two { "TwoHanded" } else { "OneHanded" }.to_string()),
        is_two_handed: two_handed,
        damage: changed(&edited.min_damage, &baseline.min_damage),
        max_damage: changed(&edited.max_damage, &baseline.max_damage),
        penetration: changed(&edited.penetration, &baseline.penetration),
        dodge_penetration: changed(&edited.dodge_reduction, &baseline.dodge_reduction),
        additional_hit_chance: changed(&edited.additional_hit_chance, &baseline.additional_hit_chance),
        recoil: changed(&edited.recoil, &baseline.recoil),
        max_distance: changed(&edited.max_range, &baseline.max_range),
        max_ammo: changed(&edited.ammo, &baseline.ammo),
        rate_of_fire: changed(&edited.rate_of_fire, &baseline.rate_of_fire),
        ability_container: AbilityContainerPatch::from_slots(slots),
        components: new_fact_components(edited, baseline),
    };

    (!patch.is_empty()).then_some(patch)
}

/// Changed sub-fields of one ability slot. An explicit `Type: None` clears the
/// whole slot and carries nothing else.
pub fn diff_ability(edited: &WeaponAbility, baseline: &WeaponAbility) -> Option<AbilityPatch> {
    if edited.is_cleared() {
        return Some(AbilityPatch {
            ability_type: edited.ability_type,
            ..Default::default()
        });
    }

    let mut patch = AbilityPatch {
        ap: changed(&edited.ap, &baseline.ap),
        ability: changed(&edited.ability_bp, &baseline.ability_bp),
        ability_type: changed(&edited.ability_type, &baseline.ability_type),
        fx_settings: changed(&edited.fx_bp, &baseline.fx_bp).map(non_empty),
        ..Default::default()
    };

    if let Some(on_hit) = changed(&edited.on_hit_actions, &baseline.on_hit_actions) {
        if on_hit.is_empty() {
            patch.on_hit_override_type = Some(OnHitOverrideType::Unset);
        } else if baseline.on_hit_actions.as_deref().unwrap_or_default().is_empty() {
            patch.on_hit_override_type = Some(OnHitOverrideType::Add);
        }
        patch.on_hit_actions = Some(non_empty(on_hit));
    }

    (!patch.is_empty()).then_some(patch)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// One prepended fact-granting component per fact the edit adds
fn new_fact_components(edited: &Weapon, baseline: &Weapon) -> Vec<ComponentPatch> {
    let existing: HashSet<&str> = baseline.extra_facts.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    edited
        .extra_facts
        .iter()
        .filter(|fact| !fact.is_empty() && !existing.contains(fact.as_str()))
        .filter(|fact| seen.insert(fact.as_str()))
        .map(|fact| ComponentPatch::Prepend {
            new_element: BlueprintComponent::AddFactToEquipmentWielder(AddFactToEquipmentWielder::new(
                format!("{}{}", ADD_FACT_NAME_PREFIX, fact_component_id(&edited.name, fact)),
                fact,
            )),
        })
        .collect()
}

/// Stable identifier for a fact-granting component: the MD5 digest of
/// `"<weapon name>|<fact guid>"`, formatted as a hyphenated UUID
pub fn fact_component_id(weapon_name: &str, fact_guid: &str) -> String {
    let digest = Md5::digest(format!("{}|{}", weapon_name, fact_guid).as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    Uuid::from_bytes(bytes).hyphenated().to_string()
}
