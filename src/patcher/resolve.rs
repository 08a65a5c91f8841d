use std::collections::HashMap;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Weapon;

static GUID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-f0-9]{32}$").unwrap());

fn looks_like_guid(value: &str) -> bool {
    GUID_PATTERN.is_match(value)
}

/// Resolve a name to a GUID. Names that already have GUID shape pass through.
fn resolve_name(name: &str, name_to_guid: &HashMap<String, String>) -> Option<String> {
    if let Some(guid) = name_to_guid.get(name) {
        return Some(guid.clone());
    }
    if looks_like_guid(name) {
        return Some(name.to_string());
    }
    warn!("Could not resolve blueprint name {}", name);
    None
}

/// Fill in GUIDs an edit left out, using the human-readable names it carries.
///
/// Edits usually come from the TSV surface, which only has names for extra
/// facts and nothing but the blueprint name to identify the weapon.
pub fn resolve_references(mut weapon: Weapon, name_to_guid: &HashMap<String, String>) -> Weapon {
    if weapon.guid.trim().is_empty() {
        match resolve_name(&weapon.blueprint_name, name_to_guid) {
            Some(guid) => weapon.guid = guid,
            None => {
                warn!("Edited weapon {} has no resolvable GUID", weapon.blueprint_name);
                return weapon;
            }
        }
    }

    if weapon.extra_fact_names.len() != weapon.extra_facts.len() {
        weapon.extra_facts = weapon
            .extra_fact_names
            .iter()
            .filter_map(|name| resolve_name(name, name_to_guid))
            .collect();
    }

    for ability in weapon.abilities.iter_mut().flatten() {
        fill_from_name(&mut ability.ability_bp, &ability.ability_bp_name, name_to_guid);
        fill_from_name(&mut ability.fx_bp, &ability.fx_bp_name, name_to_guid);
        fill_from_name(&mut ability.on_hit_actions, &ability.on_hit_action_name, name_to_guid);
    }

    weapon
}

fn fill_from_name(guid: &mut Option<String>, name: &Option<String>, name_to_guid: &HashMap<String, String>) {
    if guid.is_some() {
        return;
    }
    match name.as_deref() {
        // an explicitly emptied name clears the reference as well
        Some("") => *guid = Some(String::new()),
        Some(name) => *guid = resolve_name(name, name_to_guid),
        None => {}
    }
}
