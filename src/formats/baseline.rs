use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};

use super::tsv::{TSV_EXTENSION, read_tsv, write_tsv};
use crate::analyzer::group_by_type;
use crate::types::Weapon;
use crate::utils::{create_dir_if_not_exists, find_files_by_extension, has_any_extension};

pub const BASELINE_FILE: &str = "Weapons.json";
pub const JSON_EXTENSION: &str = "json";

/// Write all weapons to `<dir>/Weapons.json`
pub fn save_baseline(dir: &Path, weapons: &[Weapon]) -> Result<PathBuf> {
    create_dir_if_not_exists(dir)?;
    let path = dir.join(BASELINE_FILE);
    save_baseline_file(&path, weapons)?;
    info!("Saved {} weapons to {}", weapons.len(), path.display());
    Ok(path)
}

/// Write one `<WeaponType>Weapons.json` per grouping
pub fn save_split_baseline(dir: &Path, weapons: &[Weapon]) -> Result<Vec<PathBuf>> {
    create_dir_if_not_exists(dir)?;
    let mut paths = Vec::new();
    for (weapon_type, group) in group_by_type(weapons) {
        let path = dir.join(format!("{}{}", weapon_type, BASELINE_FILE));
        save_baseline_file(&path, &group)?;
        paths.push(path);
    }
    info!("Saved {} weapons across {} files in {}", weapons.len(), paths.len(), dir.display());
    Ok(paths)
}

pub fn save_baseline_file(path: &Path, weapons: &[Weapon]) -> Result<()> {
    let json = serde_json::to_string_pretty(weapons)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_baseline_file(path: &Path) -> Result<Vec<Weapon>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load every baseline file in `dir`, whole or split
pub fn load_baseline_dir(dir: &Path) -> Result<Vec<Weapon>> {
    if !dir.is_dir() {
        bail!("Baseline directory does not exist: {}", dir.display());
    }

    let files = find_files_by_extension(dir, &[JSON_EXTENSION]);
    if files.is_empty() {
        bail!("No baseline files found in {}", dir.display());
    }

    let mut weapons = Vec::new();
    for file in &files {
        weapons.extend(load_baseline_file(file)?);
    }
    info!("Loaded {} baseline weapons from {} files", weapons.len(), files.len());
    Ok(weapons)
}

/// Edit files in `dir`: TSV sheets and baseline-shaped JSON
pub fn edit_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Changes directory does not exist: {}", dir.display());
    }
    Ok(find_files_by_extension(dir, &[TSV_EXTENSION, JSON_EXTENSION]))
}

pub fn load_edit_file(path: &Path) -> Result<Vec<Weapon>> {
    if has_any_extension(path, &[TSV_EXTENSION]) {
        read_tsv(path)
    } else {
        load_baseline_file(path)
    }
}

pub fn save_edit_file(path: &Path, weapons: &[Weapon]) -> Result<()> {
    if has_any_extension(path, &[TSV_EXTENSION]) {
        write_tsv(path, weapons)
    } else {
        save_baseline_file(path, weapons)
    }
}

/// Every edited weapon in `dir`. Unreadable files are logged and skipped.
pub fn load_edit_dir(dir: &Path) -> Result<Vec<Weapon>> {
    let mut weapons = Vec::new();
    for file in edit_files(dir)? {
        match load_edit_file(&file) {
            Ok(edits) => weapons.extend(edits),
            Err(e) => warn!("Skipping {}: {:#}", file.display(), e),
        }
    }
    Ok(weapons)
}
