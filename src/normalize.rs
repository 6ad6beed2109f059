//! URL canonicalization for stable hashing.
//!
//! Two URLs that differ only in tracking parameters or fragments must dedupe
//! to the same record. Normalization lowercases the scheme and host, strips
//! the fragment, and drops known tracking query parameters while leaving the
//! rest of the query untouched, order and percent-encoding included. The
//! scheme itself is preserved, so `http://` and `https://` variants of the
//! same page hash differently.

use sha2::{Digest, Sha256};
use url::Url;

/// Query parameters that never affect page identity.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "source",
    "ref",
    "fbclid",
    "gclid",
    "ocid",
    "mc_cid",
    "mc_eid",
];

/// Canonicalize a URL for hashing. Falls back to the input unchanged when it
/// does not parse as an absolute URL; this function never fails.
pub fn normalize_url(raw: &str) -> String {
    let mut parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };

    parsed.set_fragment(None);

    if let Some(query) = parsed.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| {
                let key = pair.split('=').next().unwrap_or(pair);
                !TRACKING_PARAMS.contains(&key)
            })
            .collect();

        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.set_query(Some(&kept.join("&")));
        }
    }

    parsed.to_string()
}

/// SHA-256 hex digest of the normalized URL.
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    hex::encode(hasher.finalize())
}
