use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use parser_blueprint::{
    BlueprintComponent, BlueprintData, BlueprintItemWeapon, BlueprintRef, NONE_TEXT, RawAbility,
    decode_file,
};
use rayon::prelude::*;

use super::types::WeaponExtraction;
use crate::database::{BlueprintDatabase, file_stem};
use crate::scanner::TreeScanner;
use crate::types::{
    AbilityType, FactRequirement, OnHitOverrideType, StatRestriction, Weapon, WeaponAbility,
    WeaponCategory, WeaponClassification, WeaponFamily, parse_optional,
};

/// Decode and merge every weapon under `weapons_dir`
pub async fn extract_weapons(
    weapons_dir: &Path,
    extension: &str,
    db: &BlueprintDatabase,
    threads: usize,
) -> Result<WeaponExtraction> {
    let output = TreeScanner::new(weapons_dir, extension).scan(read_weapon).await?;
    info!("Decoded {} candidate weapons", output.results.len());

    let weapons = merge_weapons(output.results, db, threads)?;
    Ok(WeaponExtraction {
        weapons,
        failures: output.failures,
    })
}

/// Decode one weapon file. Non-weapon records and weapons that cannot be
/// obtained yield `None`.
pub fn read_weapon(path: &Path) -> Result<Option<Weapon>> {
    let blueprint = decode_file(path)?;
    let BlueprintData::ItemWeapon(data) = blueprint.data else {
        return Ok(None);
    };

    if !data.is_obtainable() {
        debug!("Skipping unobtainable weapon {}", path.display());
        return Ok(None);
    }

    let mut weapon = assemble_weapon(&blueprint.asset_id, &data, path)?;
    weapon.blueprint_name = file_stem(path)?;
    Ok(Some(weapon))
}

fn assemble_weapon(guid: &str, data: &BlueprintItemWeapon, path: &Path) -> Result<Weapon> {
    let mut weapon = Weapon {
        guid: guid.to_string(),
        name_key: data.display_name.key.clone(),
        name_shared_key: data.display_name.shared_key().to_string(),
        description_key: data.description.key.clone(),
        description_shared_key: data.description.shared_key().to_string(),
        category: parse_field::<WeaponCategory>(data.category.as_deref())?,
        family: parse_field::<WeaponFamily>(data.family.as_deref())?,
        classification: parse_field::<WeaponClassification>(data.classification.as_deref())?,
        heavy: Some(data.is_heavy()),
        two_handed: Some(data.is_two_handed()),
        min_damage: data.damage,
        max_damage: data.max_damage,
        penetration: data.penetration,
        dodge_reduction: data.dodge_penetration,
        additional_hit_chance: data.additional_hit_chance,
        recoil: data.recoil,
        max_range: data.max_distance,
        ammo: data.max_ammo,
        rate_of_fire: data.rate_of_fire,
        ..Default::default()
    };

    for (slot, raw) in weapon.abilities.iter_mut().zip(data.ability_container.slots()) {
        if let Some(raw) = raw {
            *slot = convert_ability(raw)?;
        }
    }

    let mut stat_restrictions = Vec::new();
    for component in &data.components {
        match component {
            BlueprintComponent::EquipmentRestrictionStat(restriction) => {
                stat_restrictions.push(StatRestriction {
                    stat: restriction.stat.clone(),
                    requirement: restriction.min_value,
                });
            }
            BlueprintComponent::EquipmentRestrictionHasFacts(restriction) => {
                weapon.fact_requirements.push(FactRequirement {
                    all: restriction.all,
                    negate: restriction.inverted,
                    facts: restriction.facts.iter().filter_map(|f| reference(f)).collect(),
                    fact_names: Vec::new(),
                });
            }
            BlueprintComponent::AddFactToEquipmentWielder(grant) => {
                if let Some(fact) = reference(&grant.fact) {
                    weapon.extra_facts.push(fact);
                }
            }
            _ => {}
        }
    }

    if stat_restrictions.len() > 1 {
        warn!(
            "Found {} stat restrictions on {}, keeping the first",
            stat_restrictions.len(),
            path.display()
        );
    }
    weapon.stat_restriction = stat_restrictions.into_iter().next();

    Ok(weapon)
}

fn convert_ability(raw: &RawAbility) -> Result<Option<WeaponAbility>> {
    if raw.ability_type == NONE_TEXT {
        return Ok(None);
    }

    let ability_type: AbilityType = raw
        .ability_type
        .parse()
        .map_err(|e| anyhow!("Invalid ability type: {}", e))?;

    Ok(Some(WeaponAbility {
        ability_type: Some(ability_type),
        ability_bp: raw.ability.as_deref().and_then(reference),
        fx_bp: raw.fx_settings.as_deref().and_then(reference),
        on_hit_actions: raw.on_hit_actions.as_deref().and_then(reference),
        ap: Some(raw.ap),
        on_hit_override_type: parse_field::<OnHitOverrideType>(raw.on_hit_override_type.as_deref())?,
        ..Default::default()
    }))
}

/// A missing field and the `None` sentinel both leave the value absent
fn parse_field<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    Ok(raw.map(parse_optional::<T>).transpose()?.flatten())
}

fn reference(raw: &str) -> Option<String> {
    BlueprintRef::parse(raw).guid().map(String::from)
}

/// Attach resolved names, display text and sources to decoded weapons
pub fn merge_weapons(weapons: Vec<Weapon>, db: &BlueprintDatabase, threads: usize) -> Result<Vec<Weapon>> {
    let start_time = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let mut merged: Vec<Weapon> = pool.install(|| {
        weapons
            .into_par_iter()
            .map(|weapon| merge_weapon(weapon, db))
            .collect()
    });
    merged.sort_by(|a, b| a.blueprint_name.cmp(&b.blueprint_name).then_with(|| a.guid.cmp(&b.guid)));

    info!("Merged {} weapons in {} ms", merged.len(), start_time.elapsed().as_millis());
    Ok(merged)
}

/// Resolve one weapon's cross-references.
///
/// Unresolved GUIDs are echoed back as their own name; missing display text
/// resolves to an empty string.
pub fn merge_weapon(mut weapon: Weapon, db: &BlueprintDatabase) -> Weapon {
    weapon.name = lookup_text(db, &weapon.name_key, &weapon.name_shared_key);
    weapon.description = lookup_text(db, &weapon.description_key, &weapon.description_shared_key);

    for ability in weapon.abilities.iter_mut().flatten() {
        ability.ability_bp_name = ability.ability_bp.as_deref().map(|guid| db.name_or_guid(guid));
        ability.fx_bp_name = ability.fx_bp.as_deref().map(|guid| db.name_or_guid(guid));
        ability.on_hit_action_name = ability.on_hit_actions.as_deref().map(|guid| db.name_or_guid(guid));
    }

    for requirement in &mut weapon.fact_requirements {
        requirement.fact_names = requirement.facts.iter().map(|fact| db.name_or_guid(fact)).collect();
    }
    weapon.extra_fact_names = weapon.extra_facts.iter().map(|fact| db.name_or_guid(fact)).collect();

    weapon.sources = db.sources_for(&weapon.guid).to_vec();
    weapon
}

fn lookup_text(db: &BlueprintDatabase, key: &str, shared_key: &str) -> String {
    let key = if key.is_empty() { shared_key } else { key };
    db.text_for(key).unwrap_or_default().to_string()
}
