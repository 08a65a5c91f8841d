//! The operations the `weapon-scanner` binary can run

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::database::BlueprintDatabase;
use crate::extractor::WeaponExtractor;
use crate::formats::{
    GUID_LIST_FILE, load_baseline_dir, load_edit_dir, read_guid_list, save_baseline, save_split_baseline,
    write_guid_list, write_tsv,
};
use crate::patcher::{PatchEntry, PatchWriter, resolve_references};
use crate::reducer::{ReduceSummary, reduce_directory};
use crate::types::{ScannerConfig, Weapon};

/// What a regenerate run leaves behind for later operations in the same run
#[derive(Debug, Default)]
pub struct Regenerated {
    pub weapons: Vec<Weapon>,
    pub name_to_guid: HashMap<String, String>,
}

/// Build the blueprint indices behind a spinner
pub async fn build_database(config: &ScannerConfig) -> Result<BlueprintDatabase> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.set_message("Indexing blueprints");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = BlueprintDatabase::build(config).await;
    spinner.finish_and_clear();
    result
}

/// Rebuild the baseline (and GUID list) from the template
pub async fn regenerate(config: &ScannerConfig, baseline_dir: &Path, split: bool) -> Result<Regenerated> {
    let db = build_database(config).await?;
    let extraction = WeaponExtractor::with_config(config).extract(&db).await?;

    for failure in db.failures().iter().chain(&extraction.failures) {
        warn!("{}", failure);
    }

    if split {
        save_split_baseline(baseline_dir, &extraction.weapons)?;
    } else {
        save_baseline(baseline_dir, &extraction.weapons)?;
    }
    write_guid_list(&baseline_dir.join(GUID_LIST_FILE), db.sorted_name_guid_pairs())?;

    Ok(Regenerated {
        weapons: extraction.weapons,
        name_to_guid: db.name_to_guid().clone(),
    })
}

/// Export the baseline as a TSV sheet. Returns the number of rows written.
pub fn make_tsv(baseline_dir: &Path, tsv_path: &Path, obtainable_only: bool) -> Result<usize> {
    let mut weapons = load_baseline_dir(baseline_dir)?;
    if obtainable_only {
        weapons.retain(|weapon| !weapon.sources.is_empty());
    }

    write_tsv(tsv_path, &weapons)?;
    info!("Wrote {} weapons to {}", weapons.len(), tsv_path.display());
    Ok(weapons.len())
}

/// Strip baseline-identical data from every edit file in `changes_dir`
pub fn remove_duplicate_info(changes_dir: &Path, baseline_dir: &Path) -> Result<ReduceSummary> {
    let baseline: HashMap<String, Weapon> = load_baseline_dir(baseline_dir)?
        .into_iter()
        .map(|weapon| (weapon.blueprint_name.clone(), weapon))
        .collect();
    reduce_directory(changes_dir, &baseline)
}

/// Diff the edits in `changes_dir` against the baseline and write patches into `mod_path`.
///
/// Names are resolved with `name_to_guid` when the index was built in this
/// run, otherwise with the GUID list saved next to the baseline.
pub fn make_patches(
    changes_dir: &Path,
    baseline_dir: &Path,
    mod_path: &Path,
    name_to_guid: Option<&HashMap<String, String>>,
) -> Result<Vec<PatchEntry>> {
    let loaded;
    let names = match name_to_guid {
        Some(names) => names,
        None => {
            loaded = read_guid_list(&baseline_dir.join(GUID_LIST_FILE))?;
            &loaded
        }
    };

    let edits: Vec<Weapon> = load_edit_dir(changes_dir)?
        .into_iter()
        .map(|weapon| resolve_references(weapon, names))
        .collect();
    let baseline = load_baseline_dir(baseline_dir)?;

    PatchWriter::new(mod_path).write(&edits, &baseline)
}
