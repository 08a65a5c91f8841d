use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Whether `path` has one of `extensions` (compared case-insensitively)
pub fn has_any_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
        .unwrap_or(false)
}

/// Files directly inside `dir` with one of `extensions`, sorted by path
pub fn find_files_by_extension(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_any_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Create a directory if it doesn't exist
pub fn create_dir_if_not_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_files_is_shallow_and_sorted() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.tsv"), "")?;
        fs::write(dir.path().join("a.JSON"), "")?;
        fs::write(dir.path().join("notes.txt"), "")?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested/c.tsv"), "")?;

        let files = find_files_by_extension(dir.path(), &["tsv", "json"]);
        assert_eq!(files, vec![dir.path().join("a.JSON"), dir.path().join("b.tsv")]);
        Ok(())
    }

    #[test]
    fn test_create_dir_if_not_exists() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("x/y");
        create_dir_if_not_exists(&nested)?;
        create_dir_if_not_exists(&nested)?;
        assert!(nested.is_dir());
        Ok(())
    }
}
