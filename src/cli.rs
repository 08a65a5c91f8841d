//! CLI argument definitions for weapon-scanner

use std::path::PathBuf;

use clap::Parser;
use parser_blueprint::DEFAULT_LOCALE;
use weapon_scanner::ScannerConfig;

#[derive(Parser, Debug)]
#[command(name = "weapon-scanner")]
#[command(about = "Extracts Rogue Trader weapon blueprints and turns edits into patches")]
#[command(version)]
pub struct Cli {
    /// Rebuild the baseline and GUID list from the template
    #[arg(long)]
    pub regenerate: bool,

    /// Export the baseline as a TSV sheet
    #[arg(long)]
    pub make_tsv: bool,

    /// Strip baseline-identical data from the edit files
    #[arg(long)]
    pub remove_duplicate_info: bool,

    /// Write patches for every edited weapon
    #[arg(long)]
    pub make_patches: bool,

    /// Root of the modification template (holds Blueprints/ and Strings/)
    #[arg(long, default_value = "../../../")]
    pub template_path: PathBuf,

    /// Root of the mod that receives the patches
    #[arg(long, default_value = ".")]
    pub mod_path: PathBuf,

    /// Directory holding the baseline files and Guids.txt
    #[arg(long, default_value = "baseline")]
    pub baseline_path: PathBuf,

    /// TSV sheet written by --make-tsv
    #[arg(long, default_value = "Weapons.tsv")]
    pub tsv_path: PathBuf,

    /// Directory holding edited .tsv/.json files
    #[arg(long, default_value = "changes")]
    pub changes_path: PathBuf,

    /// Write one baseline file per weapon grouping
    #[arg(long)]
    pub split_baseline: bool,

    /// Only export weapons that can be obtained in game
    #[arg(long)]
    pub obtainable: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Locale used for display names and descriptions
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,
}

impl Cli {
    pub fn has_operation(&self) -> bool {
        self.regenerate || self.make_tsv || self.remove_duplicate_info || self.make_patches
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        let defaults = ScannerConfig::default();
        ScannerConfig {
            template_root: self.template_path.clone(),
            mod_path: self.mod_path.clone(),
            max_threads: self.threads.unwrap_or(defaults.max_threads).max(1),
            locale: self.locale.clone(),
            ..defaults
        }
    }
}
