use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::feed::FeedEntry;

/// The JSON document written for each ingested entry.
///
/// Every field is a string; absent source fields become `""`. Field order is
/// `title, link, summary, published`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// RFC 3339 in UTC with second precision, e.g. `2024-01-02T00:00:00Z`.
    ///
    /// `feed-rs` only exposes the parsed timestamp, not the string the feed
    /// carried, so an RFC 2822 `pubDate` or a non-UTC offset is stored in this
    /// normalized form rather than verbatim.
    pub published: String,
}

impl StoredRecord {
    pub fn from_entry(entry: &FeedEntry) -> Self {
        Self {
            title: entry.title.clone().unwrap_or_default(),
            link: entry.link.clone().unwrap_or_default(),
            summary: entry.summary.clone().unwrap_or_default(),
            published: entry
                .published
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
