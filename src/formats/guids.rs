use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

pub const GUID_LIST_FILE: &str = "Guids.txt";
const SEPARATOR: char = '|';

/// Write `name|guid` lines sorted by name
pub fn write_guid_list<'a>(path: &Path, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
    let mut pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
    pairs.sort();

    let mut content = String::new();
    for (name, guid) in &pairs {
        content.push_str(name);
        content.push(SEPARATOR);
        content.push_str(guid);
        content.push('\n');
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} name/GUID pairs to {}", pairs.len(), path.display());
    Ok(())
}

/// Read a GUID list into a name to GUID map. Malformed lines are skipped.
pub fn read_guid_list(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut map = HashMap::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match line.rsplit_once(SEPARATOR) {
            Some((name, guid)) if !name.is_empty() && !guid.is_empty() => {
                map.insert(name.to_string(), guid.trim().to_string());
            }
            _ => warn!("{}:{}: malformed line", path.display(), line_no + 1),
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_guid_list_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(GUID_LIST_FILE);
        write_guid_list(&path, [("Lasgun", "l1"), ("Autogun", "a1")])?;

        assert_eq!(fs::read_to_string(&path)?, "Autogun|a1\nLasgun|l1\n");
        let map = read_guid_list(&path)?;
        assert_eq!(map.len(), 2);
        assert_eq!(map["Lasgun"], "l1");
        Ok(())
    }

    #[test]
    fn test_malformed_lines_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(GUID_LIST_FILE);
        fs::write(&path, "Good|g1\nno separator\n|orphan\n\nOdd|Name|o1\n")?;

        let map = read_guid_list(&path)?;
        assert_eq!(map.len(), 2);
        assert_eq!(map["Odd|Name"], "o1");
        Ok(())
    }
}
