use std::fs;

use chrono::{Duration, SecondsFormat, Utc};
use tempfile::TempDir;
use walkdir::WalkDir;

use content_vault::error::StoreError;
use content_vault::models::{keys, Metadata};
use content_vault::store::ContentStore;

fn open_store(tmp: &TempDir) -> ContentStore {
    ContentStore::open(tmp.path().join("data")).unwrap()
}

fn html_metadata(url: &str) -> Metadata {
    [(keys::URL, url), (keys::SOURCE_TYPE, "html")]
        .into_iter()
        .collect()
}

fn record_files(tmp: &TempDir) -> usize {
    WalkDir::new(tmp.path().join("data"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("md"))
        .count()
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

const ARTICLE: &str = "Wolves returned quietly across northern ridges while \
biologists tracked their movements through winter surveys";

#[test]
fn test_store_creates_sharded_record() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let id = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();

    let path = tmp
        .path()
        .join("data")
        .join(&id[..2])
        .join(&id)
        .join("html.md");
    assert!(path.is_file(), "expected record at {}", path.display());
}

#[test]
fn test_store_stamps_defaults() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let id = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();
    let metadata = store.get_metadata(&id).unwrap();

    assert_eq!(metadata.get(keys::CONTENT_ID), Some(id.as_str()));
    assert_eq!(metadata.status(), Some("pending_ai"));
    assert!(metadata.date_added().is_some());
    assert!(metadata.get(keys::URL_HASH).is_some());
    assert!(metadata.get(keys::FINGERPRINT).is_some());
}

#[test]
fn test_same_url_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let first = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();
    let second = store
        .store("completely different text body", html_metadata("https://example.com/wolves"))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(record_files(&tmp), 1);
}

#[test]
fn test_tracking_params_dedupe_to_same_record() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let first = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();
    let second = store
        .store(
            ARTICLE,
            html_metadata("https://EXAMPLE.com/wolves?utm_source=feed#top"),
        )
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(record_files(&tmp), 1);
}

#[test]
fn test_near_duplicate_under_new_url_merges() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let first = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();

    // Same significant words, reordered and duplicated, with short filler.
    let rehash = "tracked tracked surveys winter through movements their \
biologists while ridges northern across quietly returned Wolves a an of it";
    let second = store
        .store(rehash, html_metadata("https://mirror.example.org/wolves-repost"))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(record_files(&tmp), 1);
}

#[test]
fn test_distinct_content_gets_new_id() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let first = store
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();
    let second = store
        .store(
            "Entirely unrelated prose about container orchestration pipelines.",
            html_metadata("https://example.com/kubernetes"),
        )
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(record_files(&tmp), 2);
}

#[test]
fn test_round_trip_fidelity() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    // Body without trailing newline: the store guarantees exactly one.
    let body = "# Title\n\nParagraph one.\n\nParagraph two.";
    let id = store
        .store(body, html_metadata("https://example.com/a"))
        .unwrap();
    assert_eq!(store.get(&id).unwrap(), format!("{}\n", body));

    // Body already ending in a newline round-trips byte-for-byte.
    let body_nl = "line one\nline two\n";
    let id_nl = store
        .store(body_nl, html_metadata("https://example.com/b"))
        .unwrap();
    assert_eq!(store.get(&id_nl).unwrap(), body_nl);
}

#[test]
fn test_update_metadata_is_non_destructive() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let mut metadata = html_metadata("https://example.com/wolves");
    metadata.insert(keys::TITLE, "Wolves Return");
    let id = store.store(ARTICLE, metadata).unwrap();

    let patch: Metadata = [(keys::STATUS, "done"), ("summary", "A rewilding story.")]
        .into_iter()
        .collect();
    store.update_metadata(&id, &patch).unwrap();

    let updated = store.get_metadata(&id).unwrap();
    assert_eq!(updated.status(), Some("done"));
    assert_eq!(updated.get("summary"), Some("A rewilding story."));
    assert_eq!(updated.get(keys::TITLE), Some("Wolves Return"));
    assert_eq!(updated.get(keys::URL), Some("https://example.com/wolves"));
    assert_eq!(store.get(&id).unwrap(), format!("{}\n", ARTICLE));
}

#[test]
fn test_store_requires_url() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let metadata: Metadata = [(keys::SOURCE_TYPE, "html")].into_iter().collect();
    let err = store.store(ARTICLE, metadata).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_store_requires_valid_source_type() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let missing: Metadata = [(keys::URL, "https://example.com")].into_iter().collect();
    assert!(matches!(
        store.store(ARTICLE, missing).unwrap_err(),
        StoreError::Validation(_)
    ));

    let invalid: Metadata = [(keys::URL, "https://example.com"), (keys::SOURCE_TYPE, "rss")]
        .into_iter()
        .collect();
    assert!(matches!(
        store.store(ARTICLE, invalid).unwrap_err(),
        StoreError::Validation(_)
    ));
}

#[test]
fn test_unknown_id_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let missing = "00000000-0000-0000-0000-000000000000";
    assert!(matches!(store.get(missing), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.get_metadata(missing),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.update_metadata(missing, &Metadata::new()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_index_rebuild_across_reopen() {
    let tmp = TempDir::new().unwrap();

    let first = {
        let mut store = open_store(&tmp);
        store
            .store(ARTICLE, html_metadata("https://example.com/wolves"))
            .unwrap()
    };

    let mut reopened = open_store(&tmp);
    assert_eq!(reopened.record_count(), 1);

    let second = reopened
        .store(ARTICLE, html_metadata("https://example.com/wolves"))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(record_files(&tmp), 1);
}

#[test]
fn test_list_enumerates_all_records() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let a = store
        .store(ARTICLE, html_metadata("https://example.com/a"))
        .unwrap();
    let b = store
        .store(
            "Different article body about ocean currents and climate.",
            html_metadata("https://example.com/b"),
        )
        .unwrap();

    let records = store.list();
    assert_eq!(records.len(), 2);
    assert!(records.contains_key(&a));
    assert!(records.contains_key(&b));
}

#[test]
fn test_find_by_status() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let a = store
        .store(ARTICLE, html_metadata("https://example.com/a"))
        .unwrap();
    let b = store
        .store(
            "Different article body about ocean currents and climate.",
            html_metadata("https://example.com/b"),
        )
        .unwrap();

    let patch: Metadata = [(keys::STATUS, "done")].into_iter().collect();
    store.update_metadata(&a, &patch).unwrap();

    assert_eq!(store.find_by_status("done", None), vec![a]);
    assert_eq!(store.find_by_status("pending_ai", None), vec![b]);
    assert!(store.find_by_status("archived", None).is_empty());
}

#[test]
fn test_find_by_status_with_window() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let mut old = html_metadata("https://example.com/old");
    old.insert(keys::DATE_ADDED, days_ago(10));
    let old_id = store.store(ARTICLE, old).unwrap();

    let fresh_id = store
        .store(
            "Different article body about ocean currents and climate.",
            html_metadata("https://example.com/fresh"),
        )
        .unwrap();

    let recent = store.find_by_status("pending_ai", Some(7));
    assert_eq!(recent, vec![fresh_id]);

    let all = store.find_by_status("pending_ai", Some(30));
    assert!(all.contains(&old_id));
    assert_eq!(all.len(), 2);
}

#[test]
fn test_cleanup_removes_expired_records() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let mut old = html_metadata("https://example.com/old");
    old.insert(keys::DATE_ADDED, days_ago(90));
    let old_id = store.store(ARTICLE, old).unwrap();

    let fresh_id = store
        .store(
            "Different article body about ocean currents and climate.",
            html_metadata("https://example.com/fresh"),
        )
        .unwrap();

    let removed = store.cleanup(60).unwrap();
    assert_eq!(removed, 1);

    let records = store.list();
    assert!(!records.contains_key(&old_id));
    assert!(records.contains_key(&fresh_id));
    assert!(matches!(store.get(&old_id), Err(StoreError::NotFound(_))));
}

#[test]
fn test_cleanup_evicts_index_entries() {
    let tmp = TempDir::new().unwrap();
    let mut store = open_store(&tmp);

    let mut old = html_metadata("https://example.com/old");
    old.insert(keys::DATE_ADDED, days_ago(90));
    let old_id = store.store(ARTICLE, old).unwrap();

    store.cleanup(60).unwrap();

    // The URL is storable again and allocates a fresh id.
    let new_id = store
        .store(ARTICLE, html_metadata("https://example.com/old"))
        .unwrap();
    assert_ne!(old_id, new_id);
    assert!(store.get(&new_id).is_ok());
}

#[test]
fn test_headerless_file_is_tolerated() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");

    let dir = data.join("ab").join("ab12cd34");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("html.md"), "plain file with no header\n").unwrap();

    let store = ContentStore::open(&data).unwrap();
    let records = store.list();
    assert!(records.contains_key("ab12cd34"));
    assert!(records["ab12cd34"].is_empty());
    assert_eq!(
        store.get("ab12cd34").unwrap(),
        "plain file with no header\n"
    );
}
