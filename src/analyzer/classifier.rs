use super::types::WeaponType;
use crate::types::{Weapon, WeaponCategory, WeaponClassification, WeaponFamily};

const SNIPER_RIFLE_CRIT_FEATURE: &str = "7712185d9ea049609fda2784a6ca75ce";
const AXE_BLEED_ABILITY: &str = "a270dbb75ea44128b951b5d18d0b6bed";
const NAVIGATOR_PROFESSION_FEATURE: &str = "8e0cfa654ec24dbbba9e80c27433cc8e";
const WILLPOWER_BOOST_TALENTS: [&str; 4] = [
    "a5038c9866404df58f22b175262a2989",
    "98a981e836d7416bbd498d09797b78ce",
    "b6444939f07e458886eb4f5eb62667e7",
    "93cc723519914813b176a0d0a410d81e",
];
const CHAIN_LIGHTNING_ABILITY: &str = "7b68b4aa3c024f348a20dce3ef172e40";
const WANDERER_PORTENT_PRECISE_SHOT: &str = "7315f74b9a084b1d804caa90e9a26f47";
const POWER_PICK_ABILITY: &str = "08c7e7f3ee8e4090b1f4f75023bbcf30";
const WEBBER_ABILITY: &str = "52d98e3eda934168b6c60e8670546a1d";
const AELDARI_PROFICIENCY: &str = "365ad1a4ef1b4a47be74509c33b2be3b";
const DRUKHARI_PROFICIENCY: &str = "b5fe044e47604f47bf99ebd14440b579";
const PRECISE_SHOT: &str = "8fe7633db25d46a8bebc2868b8acff12";
const DARKLIGHT_BLAST: [&str; 3] = [
    "a39e837b419b4b49a06951650718d074",
    "8a31e565093b4487bbb2679a964296d4",
    "b2aae11f1461415dbc4bf59b50ed5dec",
];

/// Map a weapon to its grouping. The first matching rule wins, so the order
/// of the checks below is significant.
pub fn classify(weapon: &Weapon) -> WeaponType {
    let family = weapon.family.unwrap_or_default();
    let classification = weapon.classification.unwrap_or_default();
    let rate_of_fire = weapon.rate_of_fire.unwrap_or(0);
    let max_range = weapon.max_range.unwrap_or(0);
    let ranged_volley = rate_of_fire > 1 && max_range > 1;

    match family {
        WeaponFamily::Bolt => return WeaponType::Bolter,
        WeaponFamily::Plasma => return WeaponType::Plasma,
        WeaponFamily::Melta => return WeaponType::Melta,
        _ => {}
    }

    match classification {
        WeaponClassification::Shotgun => return WeaponType::Shotgun,
        WeaponClassification::Sword => {
            return match family {
                WeaponFamily::Force => WeaponType::ForceSword,
                WeaponFamily::Chain => WeaponType::ChainSword,
                WeaponFamily::Power => WeaponType::PowerSword,
                _ => WeaponType::Sword,
            };
        }
        WeaponClassification::Chainsaw => return WeaponType::RockSaw,
        WeaponClassification::MaulOrHammer => return WeaponType::Hammer,
        // Arc weapons are tagged SniperRifle in the game data; actual sniper rifles are not
        WeaponClassification::SniperRifle => return WeaponType::Arc,
        _ => {}
    }

    if family == WeaponFamily::Flame {
        return WeaponType::Flame;
    }
    if weapon.requires_fact(NAVIGATOR_PROFESSION_FEATURE) {
        return WeaponType::NavigatorStaff;
    }
    if ranged_volley && weapon.requires_fact(AELDARI_PROFICIENCY) {
        return WeaponType::Shuriken;
    }
    if ranged_volley && weapon.requires_fact(DRUKHARI_PROFICIENCY) {
        return WeaponType::Splinter;
    }
    if grants_fact(weapon, SNIPER_RIFLE_CRIT_FEATURE) {
        return WeaponType::Rifle;
    }
    if weapon.has_ability_bp(WANDERER_PORTENT_PRECISE_SHOT) {
        return WeaponType::Rifle;
    }
    if weapon.category == Some(WeaponCategory::Melee)
        && !weapon.two_handed.unwrap_or(false)
        && weapon.dodge_reduction.unwrap_or(0) >= 50
    {
        return WeaponType::Dagger;
    }
    if weapon.has_ability_bp(AXE_BLEED_ABILITY) {
        return WeaponType::Axe;
    }
    if WILLPOWER_BOOST_TALENTS.iter().any(|talent| grants_fact(weapon, talent)) {
        return WeaponType::PsykerStaff;
    }
    if weapon.has_ability_bp(CHAIN_LIGHTNING_ABILITY) {
        return WeaponType::PsykerStaff;
    }
    if weapon.has_ability_bp(POWER_PICK_ABILITY) {
        return WeaponType::PowerPick;
    }
    if weapon.has_ability_bp(WEBBER_ABILITY) {
        return WeaponType::Webber;
    }
    if DARKLIGHT_BLAST.iter().any(|blast| weapon.has_ability_bp(blast)) {
        return WeaponType::BlastGun;
    }

    if weapon.category == Some(WeaponCategory::Pistol) {
        return WeaponType::Pistol;
    }

    if ranged_volley && family == WeaponFamily::Solid {
        return WeaponType::Autogun;
    }
    if ranged_volley && family == WeaponFamily::Laser {
        return WeaponType::Lasgun;
    }
    if weapon.has_ability_bp(PRECISE_SHOT) {
        return WeaponType::Rifle;
    }
    WeaponType::Other
}

fn grants_fact(weapon: &Weapon, guid: &str) -> bool {
    weapon.extra_facts.iter().any(|fact| fact == guid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AbilityType, FactRequirement, WeaponAbility};
    use pretty_assertions::assert_eq;

    fn with_ability(guid: &str) -> Weapon {
        Weapon {
            abilities: [
                Some(WeaponAbility {
                    ability_type: Some(AbilityType::SingleShot),
                    ability_bp: Some(guid.to_string()),
                    ap: Some(1),
                    ..Default::default()
                }),
                None,
                None,
                None,
                None,
            ],
            ..Default::default()
        }
    }

    fn requiring(guid: &str, negate: bool) -> FactRequirement {
        FactRequirement {
            all: false,
            negate,
            facts: vec![guid.to_string()],
            fact_names: Vec::new(),
        }
    }

    #[test]
    fn test_bolt_family_wins_over_everything() {
        let weapon = Weapon {
            family: Some(WeaponFamily::Bolt),
            classification: Some(WeaponClassification::Sword),
            category: Some(WeaponCategory::Pistol),
            extra_facts: vec![SNIPER_RIFLE_CRIT_FEATURE.to_string()],
            ..with_ability(POWER_PICK_ABILITY)
        };
        assert_eq!(classify(&weapon), WeaponType::Bolter);
    }

    #[test]
    fn test_sword_variants() {
        let sword = |family| Weapon {
            classification: Some(WeaponClassification::Sword),
            family,
            ..Default::default()
        };
        assert_eq!(classify(&sword(Some(WeaponFamily::Force))), WeaponType::ForceSword);
        assert_eq!(classify(&sword(Some(WeaponFamily::Chain))), WeaponType::ChainSword);
        assert_eq!(classify(&sword(Some(WeaponFamily::Power))), WeaponType::PowerSword);
        assert_eq!(classify(&sword(None)), WeaponType::Sword);
    }

    #[test]
    fn test_sniper_rifle_classification_means_arc() {
        let weapon = Weapon {
            classification: Some(WeaponClassification::SniperRifle),
            ..Default::default()
        };
        assert_eq!(classify(&weapon), WeaponType::Arc);
    }

    #[test]
    fn test_proficiency_needs_volley() {
        let mut weapon = Weapon {
            rate_of_fire: Some(3),
            max_range: Some(10),
            fact_requirements: vec![requiring(AELDARI_PROFICIENCY, false)],
            ..Default::default()
        };
        assert_eq!(classify(&weapon), WeaponType::Shuriken);

        weapon.fact_requirements = vec![requiring(DRUKHARI_PROFICIENCY, false)];
        assert_eq!(classify(&weapon), WeaponType::Splinter);

        weapon.rate_of_fire = Some(1);
        assert_eq!(classify(&weapon), WeaponType::Other);

        weapon.rate_of_fire = Some(3);
        weapon.fact_requirements = vec![requiring(DRUKHARI_PROFICIENCY, true)];
        assert_eq!(classify(&weapon), WeaponType::Other);
    }

    #[test]
    fn test_navigator_requirement() {
        let weapon = Weapon {
            fact_requirements: vec![requiring(NAVIGATOR_PROFESSION_FEATURE, false)],
            ..Default::default()
        };
        assert_eq!(classify(&weapon), WeaponType::NavigatorStaff);
    }

    #[test]
    fn test_dagger_needs_one_handed_melee() {
        let mut weapon = Weapon {
            category: Some(WeaponCategory::Melee),
            dodge_reduction: Some(50),
            ..Default::default()
        };
        assert_eq!(classify(&weapon), WeaponType::Dagger);

        weapon.two_handed = Some(true);
        assert_eq!(classify(&weapon), WeaponType::Other);
    }

    #[test]
    fn test_ability_driven_types() {
        assert_eq!(classify(&with_ability(AXE_BLEED_ABILITY)), WeaponType::Axe);
        assert_eq!(classify(&with_ability(CHAIN_LIGHTNING_ABILITY)), WeaponType::PsykerStaff);
        assert_eq!(classify(&with_ability(POWER_PICK_ABILITY)), WeaponType::PowerPick);
        assert_eq!(classify(&with_ability(WEBBER_ABILITY)), WeaponType::Webber);
        assert_eq!(classify(&with_ability(DARKLIGHT_BLAST[1])), WeaponType::BlastGun);
        assert_eq!(classify(&with_ability(PRECISE_SHOT)), WeaponType::Rifle);
        assert_eq!(classify(&with_ability(WANDERER_PORTENT_PRECISE_SHOT)), WeaponType::Rifle);
    }

    #[test]
    fn test_willpower_talent_makes_psyker_staff() {
        let weapon = Weapon {
            extra_facts: vec![WILLPOWER_BOOST_TALENTS[2].to_string()],
            ..Default::default()
        };
        assert_eq!(classify(&weapon), WeaponType::PsykerStaff);
    }

    #[test]
    fn test_category_and_family_fallbacks() {
        let pistol = Weapon {
            category: Some(WeaponCategory::Pistol),
            family: Some(WeaponFamily::Laser),
            rate_of_fire: Some(3),
            max_range: Some(8),
            ..Default::default()
        };
        assert_eq!(classify(&pistol), WeaponType::Pistol);

        let lasgun = Weapon {
            category: Some(WeaponCategory::Basic),
            ..pistol.clone()
        };
        assert_eq!(classify(&lasgun), WeaponType::Lasgun);

        let autogun = Weapon {
            family: Some(WeaponFamily::Solid),
            ..lasgun.clone()
        };
        assert_eq!(classify(&autogun), WeaponType::Autogun);

        let single_shot = Weapon {
            rate_of_fire: Some(1),
            ..autogun
        };
        assert_eq!(classify(&single_shot), WeaponType::Other);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let weapon = Weapon {
            family: Some(WeaponFamily::Flame),
            ..Default::default()
        };
        assert_eq!(classify(&weapon), classify(&weapon.clone()));
        assert_eq!(classify(&weapon), WeaponType::Flame);
    }
}
