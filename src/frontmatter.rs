//! The on-disk record format: a `---`-delimited flat key:value header, a
//! blank line, then the body verbatim.
//!
//! ```text
//! ---
//! content_id: 4cf1a2…
//! source_type: html
//! status: pending_ai
//! ---
//!
//! # Article body
//! ```
//!
//! Parsing is tolerant: a file without a recognizable header yields empty
//! metadata and the whole file as body, so one malformed record never aborts
//! a store-wide scan.

use crate::models::Metadata;

/// Render a record file. The body is written verbatim except for a single
/// trailing newline added when missing.
pub fn encode(metadata: &Metadata, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 256);
    out.push_str("---\n");
    for (key, value) in metadata.iter() {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str("---\n\n");
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Split a record file into metadata and body.
pub fn decode(raw: &str) -> (Metadata, String) {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return (Metadata::new(), raw.to_string());
    };

    let (header, after) = if let Some(after) = rest.strip_prefix("---\n") {
        ("", after)
    } else if let Some(end) = rest.find("\n---\n") {
        (&rest[..end], &rest[end + "\n---\n".len()..])
    } else {
        return (Metadata::new(), raw.to_string());
    };

    // One blank line separates the header from the body.
    let body = after.strip_prefix('\n').unwrap_or(after);

    let mut metadata = Metadata::new();
    for line in header.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => metadata.insert(key.trim(), value.trim()),
            None => metadata.insert(line.trim(), ""),
        }
    }

    (metadata, body.to_string())
}
