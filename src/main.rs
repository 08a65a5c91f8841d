use anyhow::{Result, bail};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use weapon_scanner::commands;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if !cli.has_operation() {
        warn!("No operation requested, see --help");
        return Ok(());
    }

    let config = cli.scanner_config();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.max_threads)
        .enable_all()
        .build()?;

    let failed = runtime.block_on(run(&cli, &config));
    if failed > 0 {
        bail!("{} operations failed", failed);
    }
    Ok(())
}

/// Run the requested operations in order. Returns how many failed.
async fn run(cli: &Cli, config: &weapon_scanner::ScannerConfig) -> usize {
    let mut failed = 0;
    let mut name_to_guid = None;

    if cli.regenerate {
        match commands::regenerate(config, &cli.baseline_path, cli.split_baseline).await {
            Ok(regenerated) => {
                info!("Regenerated baseline with {} weapons", regenerated.weapons.len());
                name_to_guid = Some(regenerated.name_to_guid);
            }
            Err(e) => {
                error!("Regenerate failed: {:#}", e);
                failed += 1;
            }
        }
    }

    if cli.make_tsv {
        if let Err(e) = commands::make_tsv(&cli.baseline_path, &cli.tsv_path, cli.obtainable) {
            error!("TSV export failed: {:#}", e);
            failed += 1;
        }
    }

    if cli.remove_duplicate_info {
        if let Err(e) = commands::remove_duplicate_info(&cli.changes_path, &cli.baseline_path) {
            error!("Removing duplicate info failed: {:#}", e);
            failed += 1;
        }
    }

    if cli.make_patches {
        match commands::make_patches(&cli.changes_path, &cli.baseline_path, &config.mod_path, name_to_guid.as_ref()) {
            Ok(entries) => info!("Generated {} patches", entries.len()),
            Err(e) => {
                error!("Patch generation failed: {:#}", e);
                failed += 1;
            }
        }
    }

    failed
}
