//! In-memory dedup index: URL-hash and fingerprint lookups.
//!
//! The index is never persisted. It is rebuilt from record headers when the
//! store opens and kept in sync on every write and delete, so the filesystem
//! stays the single source of truth.

use std::collections::HashMap;

use crate::models::{keys, Metadata};

#[derive(Debug, Default)]
pub struct DedupIndex {
    by_url_hash: HashMap<String, String>,
    by_fingerprint: HashMap<String, String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a record's dedup keys from its metadata header.
    pub fn insert(&mut self, id: &str, metadata: &Metadata) {
        if let Some(url_hash) = metadata.get(keys::URL_HASH) {
            self.by_url_hash.insert(url_hash.to_string(), id.to_string());
        }
        if let Some(fingerprint) = metadata.get(keys::FINGERPRINT) {
            self.by_fingerprint.insert(fingerprint.to_string(), id.to_string());
        }
    }

    /// Drop a record's entries so lookups stop returning a dangling id.
    pub fn remove(&mut self, metadata: &Metadata) {
        if let Some(url_hash) = metadata.get(keys::URL_HASH) {
            self.by_url_hash.remove(url_hash);
        }
        if let Some(fingerprint) = metadata.get(keys::FINGERPRINT) {
            self.by_fingerprint.remove(fingerprint);
        }
    }

    pub fn find_by_url_hash(&self, url_hash: &str) -> Option<&str> {
        self.by_url_hash.get(url_hash).map(String::as_str)
    }

    pub fn find_by_fingerprint(&self, fingerprint: &str) -> Option<&str> {
        self.by_fingerprint.get(fingerprint).map(String::as_str)
    }

    pub fn url_count(&self) -> usize {
        self.by_url_hash.len()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.by_fingerprint.len()
    }
}
