//! Retention sweep and status queries.
//!
//! Both operations are linear scans over record headers. At digest-pipeline
//! volumes that is cheap, and it keeps the filesystem as the only authority.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::store::ContentStore;

impl ContentStore {
    /// Ids of records whose `status` matches exactly, optionally restricted
    /// to records added within the last `days` days.
    pub fn find_by_status(&self, status: &str, days: Option<i64>) -> Vec<String> {
        let cutoff = days.map(|d| Utc::now() - Duration::days(d));

        self.list()
            .into_iter()
            .filter(|(id, metadata)| {
                if metadata.status() != Some(status) {
                    return false;
                }
                match cutoff {
                    None => true,
                    Some(cutoff) => match metadata.date_added() {
                        Some(added) => added >= cutoff,
                        None => {
                            warn!(id = %id, "record has no parseable date_added, excluded from window");
                            false
                        }
                    },
                }
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Delete every record whose `date_added` is older than `ttl_days`.
    /// Removes record files and now-empty directories, evicts both index
    /// entries, and returns the number of files removed. Records without a
    /// parseable `date_added` are never deleted.
    pub fn cleanup(&mut self, ttl_days: i64) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(ttl_days);
        let mut removed = 0;

        for (id, metadata) in self.list() {
            let Some(added) = metadata.date_added() else {
                warn!(id = %id, "record has no parseable date_added, skipping cleanup");
                continue;
            };
            if added >= cutoff {
                continue;
            }
            removed += self.remove_record(&id, &metadata)?;
            info!(id = %id, "removed expired record");
        }

        info!(removed, ttl_days, "cleanup finished");
        Ok(removed)
    }
}
