//! Strips edited weapons down to the fields that actually differ from the baseline

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::formats::{edit_files, load_edit_file, save_edit_file};
use crate::types::{Weapon, WeaponAbility};

/// Counts from one [`reduce_directory`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReduceSummary {
    pub files: usize,
    pub kept: usize,
    pub dropped: usize,
    pub unmatched: usize,
}

/// Clear `value` when it equals the baseline value (or its default)
fn clear_same<T: PartialEq + Default + Clone>(value: &mut Option<T>, baseline: &Option<T>) {
    let same = value
        .as_ref()
        .is_some_and(|v| *v == baseline.clone().unwrap_or_default());
    if same {
        *value = None;
    }
}

/// Items of `values` not in `baseline`, first occurrence order, no duplicates
fn difference(values: &[String], baseline: &[String]) -> Vec<String> {
    let baseline: HashSet<&str> = baseline.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| !baseline.contains(value.as_str()) && seen.insert(value.as_str()))
        .cloned()
        .collect()
}

fn reduce_ability(mut ability: WeaponAbility, baseline: &WeaponAbility) -> Option<WeaponAbility> {
    clear_same(&mut ability.ability_type, &baseline.ability_type);
    clear_same(&mut ability.ability_bp, &baseline.ability_bp);
    clear_same(&mut ability.ability_bp_name, &baseline.ability_bp_name);
    clear_same(&mut ability.fx_bp, &baseline.fx_bp);
    clear_same(&mut ability.fx_bp_name, &baseline.fx_bp_name);
    clear_same(&mut ability.on_hit_actions, &baseline.on_hit_actions);
    clear_same(&mut ability.on_hit_action_name, &baseline.on_hit_action_name);
    clear_same(&mut ability.ap, &baseline.ap);
    clear_same(&mut ability.on_hit_override_type, &baseline.on_hit_override_type);
    (!ability.is_empty()).then_some(ability)
}

/// Remove everything from `edited` that `baseline` already says.
///
/// Identity and display fields are kept so the result stays recognizable.
/// Returns `None` when nothing patchable is left.
pub fn reduce(edited: &Weapon, baseline: &Weapon) -> Option<Weapon> {
    let mut weapon = edited.clone();

    clear_same(&mut weapon.category, &baseline.category);
    clear_same(&mut weapon.family, &baseline.family);
    clear_same(&mut weapon.classification, &baseline.classification);
    clear_same(&mut weapon.heavy, &baseline.heavy);
    clear_same(&mut weapon.two_handed, &baseline.two_handed);
    clear_same(&mut weapon.min_damage, &baseline.min_damage);
    clear_same(&mut weapon.max_damage, &baseline.max_damage);
    clear_same(&mut weapon.penetration, &baseline.penetration);
    clear_same(&mut weapon.dodge_reduction, &baseline.dodge_reduction);
    clear_same(&mut weapon.additional_hit_chance, &baseline.additional_hit_chance);
    clear_same(&mut weapon.recoil, &baseline.recoil);
    clear_same(&mut weapon.max_range, &baseline.max_range);
    clear_same(&mut weapon.ammo, &baseline.ammo);
    clear_same(&mut weapon.rate_of_fire, &baseline.rate_of_fire);

    for (slot, base) in weapon.abilities.iter_mut().zip(&baseline.abilities) {
        if let Some(ability) = slot.take() {
            let base = base.clone().unwrap_or_default();
            *slot = reduce_ability(ability, &base);
        }
    }

    weapon.extra_facts = difference(&weapon.extra_facts, &baseline.extra_facts);
    weapon.extra_fact_names = difference(&weapon.extra_fact_names, &baseline.extra_fact_names);

    weapon.has_patchable_fields().then_some(weapon)
}

/// Reduce every edit file in `dir` in place against baselines keyed by blueprint name.
///
/// Weapons without a baseline are kept unchanged; weapons with nothing left
/// are dropped from their file.
pub fn reduce_directory(dir: &Path, baseline: &HashMap<String, Weapon>) -> Result<ReduceSummary> {
    let mut summary = ReduceSummary::default();

    for file in edit_files(dir)? {
        let weapons = match load_edit_file(&file) {
            Ok(weapons) => weapons,
            Err(e) => {
                warn!("Skipping {}: {:#}", file.display(), e);
                continue;
            }
        };
        info!("Removing duplicate info from {}", file.display());

        let mut reduced = Vec::with_capacity(weapons.len());
        for weapon in weapons {
            let Some(base) = baseline.get(&weapon.blueprint_name) else {
                warn!("No baseline for {}, keeping it as is", weapon);
                summary.unmatched += 1;
                reduced.push(weapon);
                continue;
            };
            match reduce(&weapon, base) {
                Some(weapon) => {
                    summary.kept += 1;
                    reduced.push(weapon);
                }
                None => summary.dropped += 1,
            }
        }

        save_edit_file(&file, &reduced)?;
        summary.files += 1;
    }

    info!(
        "Reduced {} files: {} weapons kept, {} dropped, {} without baseline",
        summary.files, summary.kept, summary.dropped, summary.unmatched
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{load_baseline_file, read_tsv, save_baseline_file, write_tsv};
    use crate::types::{AbilityType, WeaponCategory};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn baseline() -> Weapon {
        let mut weapon = Weapon {
            guid: "w1".to_string(),
            blueprint_name: "Autogun".to_string(),
            name: "Autogun".to_string(),
            category: Some(WeaponCategory::Basic),
            min_damage: Some(10),
            max_damage: Some(14),
            extra_facts: vec!["f1".to_string()],
            extra_fact_names: vec!["Fact One".to_string()],
            ..Default::default()
        };
        weapon.abilities[0] = Some(WeaponAbility {
            ability_type: Some(AbilityType::SingleShot),
            ability_bp: Some("a1".to_string()),
            ability_bp_name: Some("Single".to_string()),
            ap: Some(1),
            ..Default::default()
        });
        weapon
    }

    #[test]
    fn test_identical_weapon_reduces_to_nothing() {
        assert_eq!(reduce(&baseline(), &baseline()), None);
    }

    #[test]
    fn test_only_changed_fields_survive() {
        let mut edited = baseline();
        edited.min_damage = Some(12);
        edited.extra_facts.push("f2".to_string());
        edited.extra_facts.push("f2".to_string());
        edited.abilities[0].as_mut().unwrap().ap = Some(2);

        let reduced = reduce(&edited, &baseline()).unwrap();
        assert_eq!(reduced.min_damage, Some(12));
        assert_eq!(reduced.max_damage, None);
        assert_eq!(reduced.category, None);
        assert_eq!(reduced.extra_facts, vec!["f2".to_string()]);
        assert!(reduced.extra_fact_names.is_empty());
        assert_eq!(
            reduced.abilities[0],
            Some(WeaponAbility {
                ap: Some(2),
                ..Default::default()
            })
        );
        assert_eq!(reduced.blueprint_name, "Autogun");
        assert_eq!(reduced.name, "Autogun");
    }

    #[test]
    fn test_explicit_default_against_absent_baseline_is_cleared() {
        let edited = Weapon {
            blueprint_name: "Autogun".to_string(),
            recoil: Some(0),
            heavy: Some(false),
            ..Default::default()
        };
        assert_eq!(reduce(&edited, &baseline()), None);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let mut edited = baseline();
        edited.category = Some(WeaponCategory::Unset);
        edited.ammo = Some(30);
        edited.abilities[1] = Some(WeaponAbility {
            ability_type: Some(AbilityType::Burst),
            ap: Some(2),
            ..Default::default()
        });

        let once = reduce(&edited, &baseline()).unwrap();
        let twice = reduce(&once, &baseline()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_reduce_directory_rewrites_files() -> Result<()> {
        let dir = tempdir()?;
        let mut changed = baseline();
        changed.max_damage = Some(20);
        let stranger = Weapon {
            blueprint_name: "Stranger".to_string(),
            ammo: Some(5),
            ..Default::default()
        };

        save_baseline_file(&dir.path().join("edits.json"), &[baseline(), changed, stranger.clone()])?;
        let sheet = Weapon {
            blueprint_name: "Autogun".to_string(),
            min_damage: Some(10),
            ..Default::default()
        };
        write_tsv(&dir.path().join("sheet.tsv"), &[sheet])?;

        let baselines = HashMap::from([("Autogun".to_string(), baseline())]);
        let summary = reduce_directory(dir.path(), &baselines)?;
        assert_eq!(
            summary,
            ReduceSummary {
                files: 2,
                kept: 1,
                dropped: 2,
                unmatched: 1,
            }
        );

        let edits = load_baseline_file(&dir.path().join("edits.json"))?;
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].max_damage, Some(20));
        assert_eq!(edits[0].min_damage, None);
        assert_eq!(edits[1], stranger);
        assert!(read_tsv(&dir.path().join("sheet.tsv"))?.is_empty());
        Ok(())
    }
}
