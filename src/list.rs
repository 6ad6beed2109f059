//! The `list` command: enumerate records, optionally filtered by status and
//! time window.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::models::{keys, Metadata};
use crate::store::ContentStore;

pub fn run_list(
    store: &ContentStore,
    status: Option<&str>,
    days: Option<i64>,
    json: bool,
) -> Result<()> {
    let records = store.list();

    let ids: Vec<String> = match status {
        Some(status) => store.find_by_status(status, days),
        None => records.keys().cloned().collect(),
    };

    if json {
        let selected: BTreeMap<&String, &Metadata> = ids
            .iter()
            .filter_map(|id| records.get_key_value(id))
            .collect();
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    println!(
        "{:<36}  {:<8}  {:<12}  {:<20}  {}",
        "ID", "SOURCE", "STATUS", "ADDED", "TITLE"
    );
    for id in &ids {
        let Some(metadata) = records.get(id) else {
            continue;
        };
        println!(
            "{:<36}  {:<8}  {:<12}  {:<20}  {}",
            id,
            metadata.get(keys::SOURCE_TYPE).unwrap_or("-"),
            metadata.get(keys::STATUS).unwrap_or("-"),
            metadata.get(keys::DATE_ADDED).unwrap_or("-"),
            metadata.get(keys::TITLE).unwrap_or(""),
        );
    }
    println!();
    println!(
        "{} record{}",
        ids.len(),
        if ids.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
