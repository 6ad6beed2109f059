//! The `add` command: ingest a markdown document into the store.
//!
//! Reads the body from a file (or stdin with `-`), attaches the required
//! metadata, and reports whether the store created a new record or resolved
//! the document to an existing duplicate.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{keys, Metadata};
use crate::store::ContentStore;

pub fn run_add(
    store: &mut ContentStore,
    file: &Path,
    url: &str,
    source_type: &str,
    title: Option<&str>,
) -> Result<()> {
    let body = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let mut metadata = Metadata::new();
    metadata.insert(keys::URL, url);
    metadata.insert(keys::SOURCE_TYPE, source_type);
    if let Some(title) = title {
        metadata.insert(keys::TITLE, title);
    }

    let before = store.record_count();
    let id = store.store(&body, metadata)?;

    if store.record_count() > before {
        println!("stored {}", id);
    } else {
        println!("duplicate of {}", id);
    }
    Ok(())
}
