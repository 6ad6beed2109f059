//! Store statistics and health overview.
//!
//! Provides a quick summary of what's stored: record counts, disk usage, and
//! per-source and per-status breakdowns. Used by `cvault stats` to give
//! confidence that ingestion and enrichment are keeping up.

use std::collections::BTreeMap;

use anyhow::Result;
use walkdir::WalkDir;

use crate::models::keys;
use crate::store::ContentStore;

/// Run the stats command: scan the store and print a summary.
pub fn run_stats(store: &ContentStore) -> Result<()> {
    let records = store.list();

    let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut newest: Option<String> = None;

    for metadata in records.values() {
        let source = metadata.get(keys::SOURCE_TYPE).unwrap_or("unknown");
        *by_source.entry(source.to_string()).or_default() += 1;

        let status = metadata.get(keys::STATUS).unwrap_or("unknown");
        *by_status.entry(status.to_string()).or_default() += 1;

        if let Some(added) = metadata.get(keys::DATE_ADDED) {
            if newest.as_deref().map_or(true, |n| added > n) {
                newest = Some(added.to_string());
            }
        }
    }

    let disk_bytes: u64 = WalkDir::new(store.root())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum();

    println!("Content Vault — Store Stats");
    println!("===========================");
    println!();
    println!("  Root:     {}", store.root().display());
    println!("  Size:     {}", format_bytes(disk_bytes));
    println!("  Records:  {}", records.len());
    if let Some(newest) = newest {
        println!("  Newest:   {}", newest);
    }

    print_breakdown("By source:", &by_source);
    print_breakdown("By status:", &by_status);
    println!();

    Ok(())
}

fn print_breakdown(label: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("  {}", label);
    for (key, count) in counts {
        println!("    {:<24} {:>6}", key, count);
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
