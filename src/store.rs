//! Content-addressed record store.
//!
//! Records live at `<root>/<first-2-chars-of-id>/<id>/<source_type>.md`,
//! where the id is a UUID v4 assigned on first ingestion. Every write goes
//! through a temp-file-and-rename so a crash mid-write never leaves a
//! half-written record where the index rebuild would see it.
//!
//! Dedup flow on `store()`: normalize the URL and check the URL index (hit
//! returns the existing id with no write); otherwise fingerprint the content
//! and check the fingerprint index, confirming a hit with a Jaccard
//! similarity gate before reusing the existing id. Only then is a new record
//! created.
//!
//! All I/O is synchronous `std::fs`. Mutating operations take `&mut self`,
//! which serializes writers within a process; concurrent processes writing
//! the same root are not supported.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{Result, StoreError};
use crate::fingerprint::{content_fingerprint, similarity, SIMILARITY_THRESHOLD};
use crate::frontmatter;
use crate::index::DedupIndex;
use crate::models::{keys, Metadata, SourceType, STATUS_PENDING_AI};
use crate::normalize::url_hash;

pub struct ContentStore {
    root: PathBuf,
    index: DedupIndex,
}

impl ContentStore {
    /// Open (or create) a store rooted at `root`, rebuilding the dedup index
    /// with one header read per record.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut store = Self {
            root,
            index: DedupIndex::new(),
        };
        for (id, metadata) in store.scan() {
            store.index.insert(&id, &metadata);
        }
        info!(
            root = %store.root.display(),
            urls = store.index.url_count(),
            fingerprints = store.index.fingerprint_count(),
            "content store opened"
        );
        Ok(store)
    }

    /// Store a document, deduplicating by URL and by content.
    ///
    /// Returns the id of the stored record: either a newly allocated one or
    /// the id of an existing duplicate. `metadata` must carry `url` and a
    /// valid `source_type`; all other keys pass through untouched.
    pub fn store(&mut self, body: &str, mut metadata: Metadata) -> Result<String> {
        let url = metadata
            .get(keys::URL)
            .ok_or_else(|| StoreError::Validation("metadata must include 'url'".into()))?
            .to_string();
        let source_type: SourceType = metadata
            .get(keys::SOURCE_TYPE)
            .ok_or_else(|| StoreError::Validation("metadata must include 'source_type'".into()))?
            .parse()?;

        let url_hash = url_hash(&url);
        if let Some(existing) = self.index.find_by_url_hash(&url_hash) {
            info!(url = %url, id = existing, "duplicate URL, reusing record");
            return Ok(existing.to_string());
        }

        let title = metadata.get(keys::TITLE).unwrap_or("").to_string();
        let fingerprint = content_fingerprint(body, &title);

        if let Some(existing) = self.index.find_by_fingerprint(&fingerprint) {
            let existing = existing.to_string();
            // Confirm with similarity before merging; equal fingerprints
            // imply equal significant-word sets, so this gate only matters
            // if the fingerprint algorithm ever loosens.
            match self.get(&existing) {
                Ok(existing_body) => {
                    let score = similarity(body, &existing_body);
                    if score >= SIMILARITY_THRESHOLD {
                        info!(id = %existing, score, "near-duplicate content, reusing record");
                        return Ok(existing);
                    }
                }
                // Stale index entry; fall through and create a new record.
                Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let id = Uuid::new_v4().to_string();
        metadata.insert(keys::CONTENT_ID, id.as_str());
        metadata.insert(keys::URL_HASH, url_hash.as_str());
        metadata.insert(keys::FINGERPRINT, fingerprint.as_str());
        if !metadata.contains(keys::DATE_ADDED) {
            metadata.insert(keys::DATE_ADDED, now_iso());
        }
        if !metadata.contains(keys::STATUS) {
            metadata.insert(keys::STATUS, STATUS_PENDING_AI);
        }

        let dir = self.record_dir(&id)?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.md", source_type.as_str()));
        write_atomic(&path, &frontmatter::encode(&metadata, body))?;

        self.index.insert(&id, &metadata);
        info!(id = %id, source_type = %source_type, "stored new record");
        Ok(id)
    }

    /// Fetch a record's body text.
    pub fn get(&self, id: &str) -> Result<String> {
        let (_, body) = read_record(&self.record_file(id)?)?;
        Ok(body)
    }

    /// Fetch a record's metadata header.
    pub fn get_metadata(&self, id: &str) -> Result<Metadata> {
        let (metadata, _) = read_record(&self.record_file(id)?)?;
        Ok(metadata)
    }

    /// Merge `patch` into a record's metadata and rewrite it in place.
    /// Patch keys win; the body is untouched.
    pub fn update_metadata(&mut self, id: &str, patch: &Metadata) -> Result<()> {
        let path = self.record_file(id)?;
        let (mut metadata, body) = read_record(&path)?;
        metadata.merge(patch);
        write_atomic(&path, &frontmatter::encode(&metadata, &body))?;
        Ok(())
    }

    /// Enumerate all records as `id → metadata`. Unreadable records are
    /// skipped with a warning rather than failing the whole listing.
    pub fn list(&self) -> BTreeMap<String, Metadata> {
        self.scan().into_iter().collect()
    }

    /// Number of records tracked by the dedup index.
    pub fn record_count(&self) -> usize {
        self.index.url_count()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete a record's files and directory and evict its index entries.
    /// Returns the number of files removed.
    pub(crate) fn remove_record(&mut self, id: &str, metadata: &Metadata) -> Result<usize> {
        let dir = self.record_dir(id)?;
        let mut removed = 0;

        if dir.is_dir() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_file() {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
            let _ = fs::remove_dir(&dir);
            if let Some(shard) = dir.parent() {
                // Succeeds only once the shard directory is empty.
                let _ = fs::remove_dir(shard);
            }
        }

        self.index.remove(metadata);
        Ok(removed)
    }

    /// Walk every record directory and read its metadata header. Unreadable
    /// records are logged and skipped (soft-miss).
    fn scan(&self) -> Vec<(String, Metadata)> {
        let mut records = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(3)
            .max_depth(3)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("md")
            {
                continue;
            }
            let Some(id) = record_id_of(path) else {
                continue;
            };
            match read_record(path) {
                Ok((metadata, _)) => records.push((id, metadata)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable record");
                }
            }
        }
        records
    }

    fn record_dir(&self, id: &str) -> Result<PathBuf> {
        let shard = id
            .get(..2)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.root.join(shard).join(id))
    }

    /// The single `.md` file inside a record's directory.
    fn record_file(&self, id: &str) -> Result<PathBuf> {
        let dir = self.record_dir(id)?;
        if dir.is_dir() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) == Some("md") {
                    return Ok(path);
                }
            }
        }
        Err(StoreError::NotFound(id.to_string()))
    }
}

/// Current UTC time as ISO-8601 with a `Z` suffix.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn read_record(path: &Path) -> Result<(Metadata, String)> {
    let raw = fs::read_to_string(path)?;
    Ok(frontmatter::decode(&raw))
}

/// Write via a temp file in the same directory plus a rename, so a crash
/// never exposes a partially written record.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("md.tmp");
    if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
        error!(path = %path.display(), error = %e, "atomic write failed");
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Recover a record id from a scanned file path. The id directory must sit
/// inside a two-character shard directory matching its prefix.
fn record_id_of(path: &Path) -> Option<String> {
    let id_dir = path.parent()?;
    let shard = id_dir.parent()?.file_name()?.to_str()?;
    let id = id_dir.file_name()?.to_str()?;
    if shard.len() == 2 && id.starts_with(shard) {
        Some(id.to_string())
    } else {
        None
    }
}
