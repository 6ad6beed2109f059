//! Core data types: source kinds and the flat metadata map.
//!
//! Metadata travels with every record as an ordered string map. The store
//! itself only interprets a handful of well-known keys; everything else is
//! opaque pass-through for the enrichment and digest collaborators.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreError;

/// Where a piece of content came from. Doubles as the stored file's stem
/// (`html.md`, `pdf.md`, `youtube.md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Html,
    Pdf,
    Youtube,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Html => "html",
            SourceType::Pdf => "pdf",
            SourceType::Youtube => "youtube",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(SourceType::Html),
            "pdf" => Ok(SourceType::Pdf),
            "youtube" => Ok(SourceType::Youtube),
            other => Err(StoreError::Validation(format!(
                "unknown source_type: '{}' (expected html, pdf, or youtube)",
                other
            ))),
        }
    }
}

/// Metadata keys the store itself reads or writes.
pub mod keys {
    pub const CONTENT_ID: &str = "content_id";
    pub const URL: &str = "url";
    pub const URL_HASH: &str = "url_hash";
    pub const FINGERPRINT: &str = "content_fingerprint";
    pub const SOURCE_TYPE: &str = "source_type";
    pub const TITLE: &str = "title";
    pub const DATE_ADDED: &str = "date_added";
    pub const STATUS: &str = "status";
}

/// Lifecycle status stamped on freshly stored content.
pub const STATUS_PENDING_AI: &str = "pending_ai";

/// Flat string metadata attached to a record.
///
/// Keys are kept sorted so the on-disk header is deterministic. Unknown keys
/// round-trip untouched: the enrichment side patches `category`, `summary`,
/// `tags`, and `relevance` in after ingestion, and the digest assembler reads
/// them back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. Values are flattened to a single line, since the
    /// on-disk header is one field per line.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into().replace(['\r', '\n'], " ");
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Merge `patch` into this metadata. Patch keys overwrite, everything
    /// else is untouched.
    pub fn merge(&mut self, patch: &Metadata) {
        for (key, value) in patch.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn url(&self) -> Option<&str> {
        self.get(keys::URL)
    }

    pub fn status(&self) -> Option<&str> {
        self.get(keys::STATUS)
    }

    /// Parsed `date_added`, if present and valid ISO-8601.
    pub fn date_added(&self) -> Option<DateTime<Utc>> {
        self.get(keys::DATE_ADDED)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}
