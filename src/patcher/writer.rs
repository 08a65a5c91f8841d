use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::diff::diff;
use super::types::PatchEntry;
use crate::types::Weapon;

pub const MANIFEST_FILE: &str = "generatedPatchesConfig.asset";
pub const PATCH_EXTENSION: &str = "patch";
const PATCH_SCRIPT_GUID: &str = "80fe07f61edc4914ac44891e22e1fdf7";
const MANIFEST_NAME: &str = "generatedPatchesConfig";
const MANIFEST_HEADER: &str = "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!114 &11400000\n";

/// Writes one `.patch` file per changed weapon plus the patch manifest
pub struct PatchWriter {
    out_dir: PathBuf,
}

impl PatchWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn patches_dir(&self) -> PathBuf {
        self.out_dir.join("Blueprints")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILE)
    }

    /// Diff every edited weapon against its baseline (matched by GUID) and
    /// write the non-empty patches. Returns the manifest entries in write order.
    pub fn write(&self, edited: &[Weapon], baseline: &[Weapon]) -> Result<Vec<PatchEntry>> {
        let by_guid: HashMap<&str, &Weapon> = baseline
            .iter()
            .map(|weapon| (weapon.guid.as_str(), weapon))
            .collect();

        let patches_dir = self.patches_dir();
        fs::create_dir_all(&patches_dir)
            .with_context(|| format!("Failed to create {}", patches_dir.display()))?;

        let mut entries = Vec::new();
        for weapon in edited {
            if *weapon == Weapon::default() {
                continue;
            }
            if weapon.blueprint_name.trim().is_empty() {
                warn!("Skipping edited weapon {} without a blueprint name", weapon.guid);
                continue;
            }
            let Some(base) = by_guid.get(weapon.guid.as_str()) else {
                warn!("No baseline for {}, skipping", weapon);
                continue;
            };
            let Some(patch) = diff(weapon, base) else {
                debug!("{} matches its baseline", weapon);
                continue;
            };

            let filename = format!("{}.{}", weapon.blueprint_name, PATCH_EXTENSION);
            let path = patches_dir.join(&filename);
            let json = serde_json::to_string_pretty(&patch)?;
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());

            entries.push(PatchEntry::new(&weapon.guid, filename));
        }

        if entries.is_empty() {
            info!("No weapon differs from its baseline, nothing to write");
            return Ok(entries);
        }

        write_manifest(&self.manifest_path(), &entries)?;
        info!("Wrote {} patches to {}", entries.len(), patches_dir.display());
        Ok(entries)
    }
}

/// Write the Unity asset listing every generated patch
pub fn write_manifest(path: &Path, entries: &[PatchEntry]) -> Result<()> {
    fs::write(path, manifest_yaml(entries)?).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read back the entries of a manifest written by [`write_manifest`]
pub fn read_manifest(path: &Path) -> Result<Vec<PatchEntry>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    // serde_yaml has no use for the Unity directives and object tag
    let body: String = content
        .lines()
        .filter(|line| !line.starts_with('%') && !line.starts_with("---"))
        .map(|line| format!("{}\n", line))
        .collect();
    let asset: ManifestAsset =
        serde_yaml::from_str(&body).with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    Ok(asset.mono_behaviour.entries)
}

pub fn manifest_yaml(entries: &[PatchEntry]) -> Result<String> {
    let asset = ManifestAsset {
        mono_behaviour: MonoBehaviour {
            entries: entries.to_vec(),
            ..Default::default()
        },
    };
    Ok(format!("{}{}", MANIFEST_HEADER, serde_yaml::to_string(&asset)?))
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestAsset {
    #[serde(rename = "MonoBehaviour")]
    mono_behaviour: MonoBehaviour,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct MonoBehaviour {
    #[serde(rename = "m_ObjectHideFlags")]
    object_hide_flags: i32,
    #[serde(rename = "m_CorrespondingSourceObject")]
    corresponding_source_object: FileId,
    #[serde(rename = "m_PrefabInstance")]
    prefab_instance: FileId,
    #[serde(rename = "m_PrefabAsset")]
    prefab_asset: FileId,
    #[serde(rename = "m_GameObject")]
    game_object: FileId,
    #[serde(rename = "m_Enabled")]
    enabled: i32,
    #[serde(rename = "m_EditorHideFlags")]
    editor_hide_flags: i32,
    #[serde(rename = "m_Script")]
    script: Script,
    #[serde(rename = "m_Name")]
    name: String,
    #[serde(rename = "m_EditorClassIdentifier")]
    editor_class_identifier: String,
    #[serde(rename = "Entries")]
    entries: Vec<PatchEntry>,
}

impl Default for MonoBehaviour {
    fn default() -> Self {
        Self {
            object_hide_flags: 0,
            corresponding_source_object: FileId::default(),
            prefab_instance: FileId::default(),
            prefab_asset: FileId::default(),
            game_object: FileId::default(),
            enabled: 1,
            editor_hide_flags: 0,
            script: Script {
                file_id: 11500000,
                guid: PATCH_SCRIPT_GUID.to_string(),
                script_type: 3,
            },
            name: MANIFEST_NAME.to_string(),
            editor_class_identifier: String::new(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileId {
    #[serde(rename = "fileID")]
    file_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Script {
    #[serde(rename = "fileID")]
    file_id: i64,
    guid: String,
    #[serde(rename = "type")]
    script_type: i32,
}
