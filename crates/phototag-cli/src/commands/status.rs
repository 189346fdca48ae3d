//! Status command handler

use anyhow::Result;
use serde_json::json;

use phototag_core::{Catalog, Config, FileStore};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(catalog: &Catalog, config: &Config, output: &Output) -> Result<()> {
    let stats = catalog.stats();
    let store = FileStore::from_config(config);
    let last_saved = catalog
        .last_saved()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "catalog_file": store.path(),
                    "catalog_exists": store.exists(),
                    "catalog_size": store.size(),
                    "last_saved": catalog.last_saved(),
                    "recovery": config.recovery.to_string(),
                    "counts": stats
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.path().display());
        }
        OutputFormat::Human => {
            println!("phototag Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Catalog:    {}", store.path().display());
            println!(
                "  Size:       {}",
                store
                    .size()
                    .map(human_size)
                    .unwrap_or_else(|| "(not saved yet)".to_string())
            );
            println!(
                "  Last saved: {}",
                last_saved.as_deref().unwrap_or("(never)")
            );
            println!("  Recovery:   {}", config.recovery);
            println!();
            println!("Contents:");
            println!("  Albums: {}", stats.albums);
            println!("  Photos: {}", stats.photos);
            println!("  Tags:   {}", stats.tags);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
