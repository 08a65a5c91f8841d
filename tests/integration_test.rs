use std::fs;
use std::path::Path;

use anyhow::Result;
use log::debug;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

use weapon_scanner::commands;
use weapon_scanner::formats::{
    GUID_LIST_FILE, load_baseline_dir, load_baseline_file, read_guid_list, read_tsv, save_baseline, tsv_string,
    parse_tsv, write_tsv,
};
use weapon_scanner::patcher::{MANIFEST_FILE, PatchEntry, fact_component_id, read_manifest};
use weapon_scanner::{
    AbilityType, BlueprintDatabase, ScannerConfig, Weapon, WeaponAbility, WeaponCategory, WeaponExtractor,
    WeaponFamily, WeaponType, classify, diff, reduce,
};

fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

const UNKNOWN_ABILITY: &str = "deadbeefdeadbeefdeadbeefdeadbeef";
const KNOWN_ABILITY: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";

fn ability(kind: &str, guid: Option<&str>, ap: i32) -> Value {
    json!({
        "Type": kind,
        "m_Ability": guid.map(|g| format!("!bp_{}", g)),
        "m_FXSettings": null,
        "m_OnHitActions": null,
        "AP": ap
    })
}

fn weapon_record(guid: &str, family: &str, can_be_used: bool, first_ability: Option<&str>, damage: i32) -> String {
    let first = match first_ability {
        Some(ability_guid) => ability("SingleShot", Some(ability_guid), 1),
        None => ability("None", None, 0),
    };
    json!({
        "AssetId": guid,
        "Data": {
            "$type": "c00f723cccf2d314198c42a572c631fd, BlueprintItemWeapon",
            "CanBeUsedInGame": can_be_used,
            "m_IsNatural": false,
            "IsUnlootable": false,
            "IsNonRemovable": false,
            "m_DisplayName": { "m_Key": format!("{}_name", guid), "Shared": null },
            "m_Description": { "m_Key": "", "Shared": null },
            "AbilityContainer": {
                "Ability1": first,
                "Ability2": ability("None", None, 0),
                "Ability3": ability("None", None, 0),
                "Ability4": ability("None", None, 0),
                "Ability5": ability("None", None, 0)
            },
            "Category": "Basic",
            "Family": family,
            "Classification": "Rifle",
            "m_Heaviness": "NotHeavy",
            "m_HoldingType": "TwoHanded",
            "WarhammerDamage": damage,
            "WarhammerMaxDamage": damage + 4,
            "WarhammerPenetration": 0,
            "DodgePenetration": 0,
            "AdditionalHitChance": 0,
            "WarhammerRecoil": 0,
            "WarhammerMaxDistance": 10,
            "WarhammerMaxAmmo": 30,
            "RateOfFire": 3,
            "Components": []
        }
    })
    .to_string()
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// A template tree with every configured subtree present
fn template() -> Result<(TempDir, ScannerConfig)> {
    let dir = tempdir()?;
    let config = ScannerConfig {
        template_root: dir.path().to_path_buf(),
        mod_path: dir.path().join("mod"),
        max_threads: 2,
        ..Default::default()
    };
    for subpath in config
        .name_subpaths
        .iter()
        .chain(&config.loot_subpaths)
        .chain(&config.unit_subpaths)
        .chain(&config.vendor_subpaths)
    {
        fs::create_dir_all(config.blueprints_root().join(subpath))?;
    }
    for subpath in &config.strings_subpaths {
        fs::create_dir_all(dir.path().join(subpath))?;
    }
    Ok((dir, config))
}

fn guid(n: usize) -> String {
    format!("{:032x}", n)
}

async fn extract(config: &ScannerConfig) -> Result<(BlueprintDatabase, Vec<Weapon>, usize)> {
    let db = BlueprintDatabase::build(config).await?;
    let extraction = WeaponExtractor::with_config(config).extract(&db).await?;
    Ok((db, extraction.weapons, extraction.failures.len()))
}

#[tokio::test]
async fn test_unusable_weapon_is_excluded() -> Result<()> {
    init();
    let (_dir, config) = template()?;
    let weapons_dir = config.weapons_dir();
    write(&weapons_dir.join("Usable.jbp"), &weapon_record(&guid(1), "Laser", true, None, 5))?;
    write(&weapons_dir.join("Prop.jbp"), &weapon_record(&guid(2), "Laser", false, None, 5))?;

    let (_, weapons, failures) = extract(&config).await?;
    assert_eq!(failures, 0);
    assert_eq!(weapons.len(), 1);
    assert_eq!(weapons[0].blueprint_name, "Usable");
    Ok(())
}

#[tokio::test]
async fn test_bolt_family_is_bolter() -> Result<()> {
    init();
    let (_dir, config) = template()?;
    write(
        &config.weapons_dir().join("Bolter_Standard.jbp"),
        &weapon_record(&guid(3), "Bolt", true, Some(KNOWN_ABILITY), 8),
    )?;

    let (_, weapons, _) = extract(&config).await?;
    assert_eq!(weapons[0].family, Some(WeaponFamily::Bolt));
    assert_eq!(classify(&weapons[0]), WeaponType::Bolter);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_unindexed_ability_name_echoes_guid() -> Result<()> {
    let (_dir, config) = template()?;
    write(
        &config.weapons_dir().join("Lasgun.jbp"),
        &weapon_record(&guid(4), "Laser", true, Some(UNKNOWN_ABILITY), 4),
    )?;
    write(
        &config.blueprints_root().join("Weapons/Abilities/Lasgun_Single.jbp"),
        &json!({ "AssetId": KNOWN_ABILITY, "Data": { "$type": "x, BlueprintAbility" } }).to_string(),
    )?;
    write(
        &config.template_root.join("Strings/Mechanics/Blueprints/Weapons/lasgun.json"),
        &json!({ "key": format!("{}_name", guid(4)), "languages": [{ "locale": "enGB", "text": "Lasgun" }] })
            .to_string(),
    )?;

    let (db, weapons, _) = extract(&config).await?;
    debug!("Indexed {:?}", db.get_stats());
    let ability = weapons[0].abilities[0].as_ref().unwrap();
    assert_eq!(ability.ability_bp.as_deref(), Some(UNKNOWN_ABILITY));
    assert_eq!(ability.ability_bp_name.as_deref(), Some(UNKNOWN_ABILITY));
    assert_eq!(weapons[0].name, "Lasgun");
    assert_eq!(db.name_for(KNOWN_ABILITY), Some("Lasgun_Single"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_file_is_isolated() -> Result<()> {
    init();
    let (_dir, config) = template()?;
    let weapons_dir = config.weapons_dir();
    for n in 0..100 {
        let sub = weapons_dir.join(format!("Group{}", n % 7));
        write(&sub.join(format!("Weapon_{:03}.jbp", n)), &weapon_record(&guid(100 + n), "Solid", true, None, 3))?;
    }
    write(&weapons_dir.join("Group3/Broken.jbp"), "{ \"AssetId\": \"x\", \"Data\": ")?;

    let (db, weapons, weapon_failures) = extract(&config).await?;
    assert_eq!(weapons.len(), 100);
    assert_eq!(weapon_failures, 1);
    // the name index is built over the same tree
    assert_eq!(db.failures().len(), 1);
    assert_eq!(weapons[0].blueprint_name, "Weapon_000");
    Ok(())
}

fn baseline_weapon() -> Weapon {
    let mut weapon = Weapon {
        guid: guid(7),
        blueprint_name: "Autogun_Standard".to_string(),
        name: "Autogun".to_string(),
        category: Some(WeaponCategory::Basic),
        family: Some(WeaponFamily::Solid),
        heavy: Some(false),
        two_handed: Some(true),
        min_damage: Some(10),
        max_damage: Some(14),
        rate_of_fire: Some(3),
        max_range: Some(10),
        extra_facts: vec!["f1".to_string()],
        extra_fact_names: vec!["Fact_One".to_string()],
        ..Default::default()
    };
    weapon.abilities[0] = Some(WeaponAbility {
        ability_type: Some(AbilityType::Burst),
        ability_bp: Some("a1".to_string()),
        ability_bp_name: Some("Autogun_Burst".to_string()),
        fx_bp: Some("fx1".to_string()),
        fx_bp_name: Some("Autogun_Fx".to_string()),
        ap: Some(2),
        ..Default::default()
    });
    weapon
}

#[test]
fn test_reduce_then_diff_drops_unchanged_damage() {
    init();
    let edited = Weapon {
        min_damage: Some(10),
        max_damage: Some(16),
        ..baseline_weapon()
    };

    let reduced = reduce(&edited, &baseline_weapon()).unwrap();
    assert_eq!(reduced.min_damage, None);
    assert_eq!(reduced.max_damage, Some(16));

    let patch = diff(&reduced, &baseline_weapon()).unwrap();
    assert_eq!(patch.damage, None);
    assert_eq!(patch.max_damage, Some(16));
    assert_eq!(reduce(&reduced, &baseline_weapon()), Some(reduced));
}

#[test]
fn test_new_fact_yields_one_deterministic_prepend() -> Result<()> {
    init();
    let mut edited = baseline_weapon();
    edited.extra_facts.push("y".to_string());

    let first = serde_json::to_value(diff(&edited, &baseline_weapon()).unwrap())?;
    let second = serde_json::to_value(diff(&edited, &baseline_weapon()).unwrap())?;
    assert_eq!(first, second);

    let components = first["Components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["PatchType"], "Prepend");
    assert_eq!(
        components[0]["NewElement"]["name"],
        format!("$AddFactToEquipmentWielder${}", fact_component_id("Autogun", "y"))
    );
    assert_eq!(components[0]["NewElement"]["m_Fact"], "!bp_y");
    assert_eq!(first.as_object().unwrap().len(), 1);
    Ok(())
}

#[test]
fn test_self_diff_is_empty() {
    init();
    assert!(diff(&baseline_weapon(), &baseline_weapon()).is_none());
    assert!(diff(&Weapon::default(), &Weapon::default()).is_none());
}

#[test]
fn test_baseline_and_tsv_round_trips() -> Result<()> {
    init();
    let dir = tempdir()?;
    let mut sparse = Weapon {
        guid: guid(8),
        blueprint_name: "Sparse".to_string(),
        recoil: Some(0),
        category: Some(WeaponCategory::Unset),
        ..Default::default()
    };
    sparse.abilities[4] = Some(WeaponAbility {
        ability_type: Some(AbilityType::Unset),
        ..Default::default()
    });
    let weapons = vec![baseline_weapon(), sparse];

    save_baseline(dir.path(), &weapons)?;
    assert_eq!(load_baseline_dir(dir.path())?, weapons);

    // TSV carries names but not ability or fact GUIDs
    let visible: Vec<Weapon> = weapons
        .iter()
        .cloned()
        .map(|mut weapon| {
            weapon.extra_facts.clear();
            for ability in weapon.abilities.iter_mut().flatten() {
                ability.ability_bp = None;
                ability.fx_bp = None;
                ability.on_hit_actions = None;
            }
            weapon
        })
        .collect();
    assert_eq!(parse_tsv(&tsv_string(&visible))?, visible);

    let path = dir.path().join("Weapons.tsv");
    write_tsv(&path, &visible)?;
    assert_eq!(read_tsv(&path)?, visible);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_patch_generation() -> Result<()> {
    init();
    let (dir, config) = template()?;
    let weapons_dir = config.weapons_dir();
    write(&weapons_dir.join("Autogun.jbp"), &weapon_record(&guid(20), "Solid", true, Some(KNOWN_ABILITY), 6))?;
    write(&weapons_dir.join("Lasgun.jbp"), &weapon_record(&guid(21), "Laser", true, None, 4))?;
    write(
        &config.blueprints_root().join("Buffs/Sharpshooter.jbp"),
        &json!({ "AssetId": guid(99), "Data": { "$type": "x, BlueprintFeature" } }).to_string(),
    )?;
    write(
        &config.blueprints_root().join("Loot/Chests/Chest_01.jbp"),
        &json!({
            "AssetId": guid(50),
            "Data": {
                "$type": "0449d0493fd70da4ba79ef76be174b92, BlueprintLoot",
                "Items": [{ "m_Item": format!("!bp_{}", guid(20)) }]
            }
        })
        .to_string(),
    )?;

    let baseline_dir = dir.path().join("baseline");
    let changes_dir = dir.path().join("changes");
    fs::create_dir_all(&changes_dir)?;

    let regenerated = commands::regenerate(&config, &baseline_dir, false).await?;
    assert_eq!(regenerated.weapons.len(), 2);
    assert_eq!(read_guid_list(&baseline_dir.join(GUID_LIST_FILE))?["Autogun"], guid(20));

    let baseline = load_baseline_file(&baseline_dir.join("Weapons.json"))?;
    assert_eq!(baseline[0].sources, vec!["Chest - Chests: Chest_01".to_string()]);

    let sheet = changes_dir.join("Weapons.tsv");
    assert_eq!(commands::make_tsv(&baseline_dir, &sheet, true)?, 1);

    let mut edits = read_tsv(&sheet)?;
    edits[0].min_damage = Some(9);
    edits[0].extra_fact_names.push("Sharpshooter".to_string());
    write_tsv(&sheet, &edits)?;

    let summary = commands::remove_duplicate_info(&changes_dir, &baseline_dir)?;
    assert_eq!(summary.kept, 1);
    let reduced = read_tsv(&sheet)?;
    assert_eq!(reduced[0].max_damage, None);
    assert_eq!(reduced[0].extra_fact_names, vec!["Sharpshooter".to_string()]);

    let entries = commands::make_patches(&changes_dir, &baseline_dir, &config.mod_path, None)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].guid, guid(20));
    assert_eq!(entries[0].filename, "Autogun.patch");

    let patch: Value = serde_json::from_str(&fs::read_to_string(config.mod_path.join("Blueprints/Autogun.patch"))?)?;
    assert_eq!(patch["WarhammerDamage"], 9);
    assert_eq!(patch["Components"][0]["NewElement"]["m_Fact"], format!("!bp_{}", guid(99)));
    assert_eq!(patch.as_object().unwrap().len(), 2);

    let manifest = read_manifest(&config.mod_path.join(MANIFEST_FILE))?;
    assert_eq!(manifest, vec![PatchEntry::new(guid(20), "Autogun.patch")]);
    Ok(())
}
