use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};
use std::fmt;

use crate::feed::FeedEntry;

/// Object key of a stored record: `YYYY/MM/DD/<sha1-hex>.json`.
///
/// The same identity source published on the same UTC day always maps to the
/// same key, which is what lets the store's existence check act as the dedup
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for `entry`.
    ///
    /// `fallback` supplies the date when the entry has no publish time; the
    /// runner passes the current time.
    pub fn derive(entry: &FeedEntry, fallback: DateTime<Utc>) -> Self {
        let digest = identity_digest(identity_source(entry));
        let date = entry.published.unwrap_or(fallback);
        Self(format!("{}/{}.json", date.format("%Y/%m/%d"), digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Entry id, else link, else the empty string.
///
/// Entries with neither collide on the digest of `""`; that is accepted.
pub fn identity_source(entry: &FeedEntry) -> &str {
    entry
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .or(entry.link.as_deref())
        .unwrap_or("")
}

/// Lowercase hex SHA-1 of `source`.
pub fn identity_digest(source: &str) -> String {
    format!("{:x}", Sha1::digest(source.as_bytes()))
}
