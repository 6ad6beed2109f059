//! The `get` and `meta` commands: print a stored record.

use anyhow::Result;

use crate::models::Metadata;
use crate::store::ContentStore;

/// Print a record's metadata header and body.
pub fn run_get(store: &ContentStore, id: &str) -> Result<()> {
    let metadata = store.get_metadata(id)?;
    let body = store.get(id)?;

    print_metadata(&metadata);
    println!();
    println!("--- Body ---");
    println!("{}", body);
    Ok(())
}

/// Print a record's metadata only.
pub fn run_meta(store: &ContentStore, id: &str) -> Result<()> {
    print_metadata(&store.get_metadata(id)?);
    Ok(())
}

fn print_metadata(metadata: &Metadata) {
    println!("--- Record ---");
    for (key, value) in metadata.iter() {
        println!("{:<22} {}", format!("{}:", key), value);
    }
}
