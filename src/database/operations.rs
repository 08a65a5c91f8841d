use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, anyhow};
use log::{debug, info};
use parser_blueprint::{BlueprintData, decode_file, decode_header, decode_string_file, strip_bp_prefix};

use crate::scanner::{ScanFailure, scan};
use crate::types::ScannerConfig;

/// GUID and file stem of every blueprint in the configured name subtrees, plus
/// the mod's own `Blueprints/` directory when it exists
pub async fn index_names(config: &ScannerConfig) -> Result<(Vec<(String, String)>, Vec<ScanFailure>)> {
    let blueprints_root = config.blueprints_root();
    let mut roots: Vec<_> = config
        .name_subpaths
        .iter()
        .map(|subpath| blueprints_root.join(subpath))
        .collect();

    let mod_blueprints = config.mod_blueprints_dir();
    if mod_blueprints.is_dir() {
        roots.push(mod_blueprints);
    }

    let mut names = Vec::new();
    let mut failures = Vec::new();
    for root in roots {
        let output = scan(&root, &config.blueprint_extension, |path: &Path| -> Result<Option<(String, String)>> {
            let header = decode_header(path)?;
            Ok(Some((header.asset_id, file_stem(path)?)))
        })
        .await?;
        names.extend(output.results);
        failures.extend(output.failures);
    }

    info!("Indexed {} blueprint names", names.len());
    Ok((names, failures))
}

/// `(item guid, source description)` pairs from loot chests, vendor tables and unit equipment
pub async fn index_sources(config: &ScannerConfig) -> Result<(Vec<(String, String)>, Vec<ScanFailure>)> {
    let blueprints_root = config.blueprints_root();
    let mut sources = Vec::new();
    let mut failures = Vec::new();

    for subpath in &config.loot_subpaths {
        let output = scan(&blueprints_root.join(subpath), &config.blueprint_extension, loot_sources).await?;
        sources.extend(output.results);
        failures.extend(output.failures);
    }

    for subpath in &config.unit_subpaths {
        let output = scan(&blueprints_root.join(subpath), &config.blueprint_extension, unit_sources).await?;
        sources.extend(output.results);
        failures.extend(output.failures);
    }

    for subpath in &config.vendor_subpaths {
        let output = scan(&blueprints_root.join(subpath), &config.blueprint_extension, vendor_sources).await?;
        sources.extend(output.results);
        failures.extend(output.failures);
    }

    info!("Indexed {} item sources", sources.len());
    Ok((sources, failures))
}

/// `(localization key, text)` pairs for the configured locale
pub async fn index_strings(config: &ScannerConfig) -> Result<(Vec<(String, String)>, Vec<ScanFailure>)> {
    let mut strings = Vec::new();
    let mut failures = Vec::new();

    for subpath in &config.strings_subpaths {
        let locale = config.locale.clone();
        let output = scan(
            &config.template_root.join(subpath),
            &config.strings_extension,
            move |path: &Path| -> Result<Option<(String, String)>> {
                let bundle = decode_string_file(path)?;
                let text = bundle.text_for(&locale)?.to_string();
                Ok(Some((bundle.key, text)))
            },
        )
        .await?;
        strings.extend(output.results);
        failures.extend(output.failures);
    }

    info!("Indexed {} localized strings", strings.len());
    Ok((strings, failures))
}

fn loot_sources(path: &Path) -> Result<Vec<(String, String)>> {
    let BlueprintData::Loot(loot) = decode_file(path)?.data else {
        return Ok(Vec::new());
    };

    let location = format!("Chest - {}: {}", parent_name(path), file_stem(path)?);
    debug!("{} holds {} items", location, loot.items.len());
    Ok(loot
        .items
        .iter()
        .map(|item| (strip_bp_prefix(&item.item).to_string(), location.clone()))
        .collect())
}

fn unit_sources(path: &Path) -> Result<Vec<(String, String)>> {
    let BlueprintData::Unit(unit) = decode_file(path)?.data else {
        return Ok(Vec::new());
    };

    let location = format!("Unit - {}: {}", parent_name(path), file_stem(path)?);
    Ok(unit
        .item_refs()
        .into_iter()
        .map(|item| (strip_bp_prefix(item).to_string(), location.clone()))
        .collect())
}

fn vendor_sources(path: &Path) -> Result<Vec<(String, String)>> {
    let BlueprintData::SharedVendorTable(vendor) = decode_file(path)?.data else {
        return Ok(Vec::new());
    };

    let vendor_name = file_stem(path)?;
    Ok(vendor
        .packs()
        .map(|pack| {
            (
                strip_bp_prefix(&pack.item).to_string(),
                format!("Vendor - {} {}PF", vendor_name, pack.profit_factor_cost),
            )
        })
        .collect())
}

/// Group `(key, value)` pairs into a multimap with each value list sorted
pub fn group_sources(pairs: Vec<(String, String)>) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (item, source) in pairs {
        grouped.entry(item).or_default().push(source);
    }
    for sources in grouped.values_mut() {
        sources.sort();
    }
    grouped
}

pub(crate) fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Invalid blueprint file name: {}", path.display()))
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
