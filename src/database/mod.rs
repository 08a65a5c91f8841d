mod operations;
mod types;

pub use operations::*;
pub use types::*;

use std::collections::HashMap;

use anyhow::Result;
use log::{info, warn};

use crate::scanner::ScanFailure;
use crate::types::ScannerConfig;

impl BlueprintDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every index by scanning the configured template subtrees.
    ///
    /// A missing subtree is a configuration error; individual bad files are
    /// logged and kept in [`BlueprintDatabase::failures`].
    pub async fn build(config: &ScannerConfig) -> Result<Self> {
        info!("Building blueprint indices from {}", config.template_root.display());

        let (names, name_failures) = index_names(config).await?;
        let (sources, source_failures) = index_sources(config).await?;
        let (strings, string_failures) = index_strings(config).await?;

        let mut db = Self::from_parts(names, sources, strings);
        db.failures = name_failures
            .into_iter()
            .chain(source_failures)
            .chain(string_failures)
            .collect();

        let stats = db.get_stats();
        info!(
            "Indexed {} blueprints, {} sourced items and {} strings",
            stats.blueprints, stats.sourced_items, stats.strings
        );
        if stats.failed > 0 {
            warn!("{} files could not be indexed", stats.failed);
        }

        Ok(db)
    }

    /// Assemble a database from already-collected pairs. Later pairs win on duplicate keys.
    pub fn from_parts(
        names: Vec<(String, String)>,
        sources: Vec<(String, String)>,
        strings: Vec<(String, String)>,
    ) -> Self {
        let guid_to_name: HashMap<String, String> = names.into_iter().collect();
        let name_to_guid = guid_to_name
            .iter()
            .map(|(guid, name)| (name.clone(), guid.clone()))
            .collect();

        Self {
            guid_to_name,
            name_to_guid,
            sources: group_sources(sources),
            strings: strings.into_iter().collect(),
            failures: Vec::new(),
        }
    }

    pub fn name_for(&self, guid: &str) -> Option<&str> {
        self.guid_to_name.get(guid).map(String::as_str)
    }

    /// Resolved name, or the GUID itself when it is not indexed
    pub fn name_or_guid(&self, guid: &str) -> String {
        self.name_for(guid).unwrap_or(guid).to_string()
    }

    pub fn guid_for(&self, name: &str) -> Option<&str> {
        self.name_to_guid.get(name).map(String::as_str)
    }

    /// Where an item can be obtained; empty when it has no known source
    pub fn sources_for(&self, guid: &str) -> &[String] {
        self.sources.get(guid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn text_for(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn name_to_guid(&self) -> &HashMap<String, String> {
        &self.name_to_guid
    }

    /// `(name, guid)` pairs sorted by name
    pub fn sorted_name_guid_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .name_to_guid
            .iter()
            .map(|(name, guid)| (name.as_str(), guid.as_str()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    /// Get statistics about the database
    pub fn get_stats(&self) -> DatabaseStats {
        DatabaseStats {
            blueprints: self.guid_to_name.len(),
            sourced_items: self.sources.len(),
            strings: self.strings.len(),
            failed: self.failures.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_name_lookup_falls_back_to_guid() {
        let db = BlueprintDatabase::from_parts(pairs(&[("g1", "Bolter_Ability")]), Vec::new(), Vec::new());
        assert_eq!(db.name_or_guid("g1"), "Bolter_Ability");
        assert_eq!(db.name_or_guid("unknown"), "unknown");
        assert_eq!(db.guid_for("Bolter_Ability"), Some("g1"));
        assert!(db.sources_for("g1").is_empty());
    }

    #[test]
    fn test_name_to_guid_is_inverse() {
        let db = BlueprintDatabase::from_parts(
            pairs(&[("g1", "A"), ("g2", "B"), ("g1", "C")]),
            Vec::new(),
            Vec::new(),
        );
        // g1 was renamed by the later entry
        assert_eq!(db.name_for("g1"), Some("C"));
        for (name, guid) in db.sorted_name_guid_pairs() {
            assert_eq!(db.name_for(guid), Some(name));
        }
        assert_eq!(db.sorted_name_guid_pairs(), vec![("B", "g2"), ("C", "g1")]);
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn minimal_template(root: &Path) {
        let config = ScannerConfig::default();
        for subpath in config
            .name_subpaths
            .iter()
            .chain(&config.loot_subpaths)
            .chain(&config.unit_subpaths)
            .chain(&config.vendor_subpaths)
        {
            fs::create_dir_all(root.join("Blueprints").join(subpath)).unwrap();
        }
        for subpath in &config.strings_subpaths {
            fs::create_dir_all(root.join(subpath)).unwrap();
        }
    }

    #[tokio::test]
    async fn test_build_from_tree() -> Result<()> {
        let template = tempdir()?;
        let mod_dir = tempdir()?;
        let root = template.path();
        minimal_template(root);

        write(
            &root.join("Blueprints/Buffs/Bleeding_Buff.jbp"),
            r#"{"AssetId": "b1", "Data": {"$type": "x, BlueprintBuff"}}"#,
        );
        write(
            &root.join("Blueprints/Loot/Footfall/Chest_01.jbp"),
            r#"{"AssetId": "c1", "Data": {"$type": "0449d0493fd70da4ba79ef76be174b92, BlueprintLoot",
                "Items": [{"m_Item": "!bp_w1"}]}}"#,
        );
        write(
            &root.join("Blueprints/Units/NPC/Pirates/Pirate_Boss.jbp"),
            r#"{"AssetId": "u1", "Data": {"$type": "fa4fa7e4548127a47a2846c91b051065, BlueprintUnit",
                "Body": {"ItemEquipmentHandSettings": {"m_PrimaryHand": "!bp_w1"}}}}"#,
        );
        write(
            &root.join("Strings/Mechanics/Blueprints/Weapons/w1_name.json"),
            r#"{"key": "k1", "languages": [{"locale": "enGB", "text": "Bolt Pistol"}]}"#,
        );
        write(
            &root.join("Strings/Mechanics/Blueprints/Weapons/broken.json"),
            r#"{"key": "k2", "languages": [{"locale": "frFR", "text": "Pistolet"}]}"#,
        );
        write(
            &mod_dir.path().join("Blueprints/MyFact.jbp"),
            r#"{"AssetId": "m1", "Data": {"$type": "x, BlueprintFeature"}}"#,
        );

        let config = ScannerConfig {
            template_root: root.to_path_buf(),
            mod_path: mod_dir.path().to_path_buf(),
            ..Default::default()
        };
        let db = BlueprintDatabase::build(&config).await?;

        assert_eq!(db.name_for("b1"), Some("Bleeding_Buff"));
        assert_eq!(db.name_for("m1"), Some("MyFact"));
        assert_eq!(db.guid_for("MyFact"), Some("m1"));
        assert_eq!(
            db.sources_for("w1"),
            &["Chest - Footfall: Chest_01".to_string(), "Unit - Pirates: Pirate_Boss".to_string()]
        );
        assert_eq!(db.text_for("k1"), Some("Bolt Pistol"));
        assert_eq!(db.text_for("k2"), None);
        assert_eq!(db.get_stats().failed, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_subtree_is_configuration_error() {
        let template = tempdir().unwrap();
        let config = ScannerConfig {
            template_root: template.path().to_path_buf(),
            ..Default::default()
        };
        assert!(BlueprintDatabase::build(&config).await.is_err());
    }
}
